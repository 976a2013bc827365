//! Highlight synchronization engine.
//!
//! Keeps a host editor's visual annotations (diagnostic squiggles and
//! symbol-reference highlights) in sync with results from a language
//! backend, batching the host's remote commands into minimal round trips.
//!
//! # Architecture
//!
//! * [`props`] — declares the fixed set of text-property types and removes
//!   all instances of a kind across loaded buffers
//! * [`diagnostics`] — [`DiagnosticHighlighter`]: full-clear-then-re-add of
//!   diagnostic properties, gated by a cross-thread dirty flag
//! * [`references`] — [`ReferenceController`]: single-flight document
//!   highlight queries with cooperative cancellation and flicker-free
//!   re-display
//! * [`store`] / [`backend`] — seams to the buffer-tracking collaborator and
//!   the language backend
//!
//! # Threading
//!
//! One cooperative main context owns the [`limn_channel::Channel`] and both
//! controllers. Background query tasks never touch highlight state; results
//! come back over an internal channel and are applied at a single
//! consumption point ([`ReferenceController::apply`]). The diagnostic dirty
//! flag is the only state mutated from outside the main context.

/// Language-backend query seam.
pub mod backend;
/// Highlight feature flags.
pub mod config;
/// Diagnostic squiggle synchronization.
pub mod diagnostics;
/// Text-property type registry and bulk removal.
pub mod props;
/// Single-flight reference highlight queries.
pub mod references;
/// Buffer-tracking collaborator seam.
pub mod store;

pub use backend::{HighlightProvider, ProviderError};
pub use config::HighlightConfig;
pub use diagnostics::{DiagnosticHighlighter, DiagnosticsNotifier};
pub use props::{declare_property_types, remove_all_instances};
pub use references::{ReferenceController, ReferenceResult};
pub use store::{BufferStore, PositionError};

/// A convenient type alias for `Result` with `E` = [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A batched round trip to the host failed.
	#[error(transparent)]
	Channel(#[from] limn_channel::Error),
	/// The host rejected a property type declaration.
	#[error("declaration of property type `{name}` rejected by host")]
	PropertyDeclaration {
		/// Name of the rejected property type.
		name: &'static str,
	},
	/// A diagnostic carried a severity outside the fixed table.
	///
	/// This is a backend/table contract mismatch, not a transient condition.
	#[error("no highlight group for severity {0:?}")]
	UnknownSeverity(lsp_types::DiagnosticSeverity),
	/// The buffer collaborator could not resolve a position.
	#[error("failed to resolve position: {0}")]
	Position(#[from] store::PositionError),
	/// A property dictionary failed to serialize.
	#[error("serialization failed: {0}")]
	Encode(#[from] serde_json::Error),
}
