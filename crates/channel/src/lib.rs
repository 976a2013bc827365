//! Batched command channel to the host editor.
//!
//! The host editor is driven through discrete remote procedure calls whose
//! round trips are expensive, so calls are accumulated into a [`Batch`] and
//! executed as one transaction:
//! * [`HostTransport`]: trait for the underlying channel (one `send_batch`
//!   call is one round trip)
//! * [`Channel`]: owns the transport and hands out batches
//! * [`Batch`]: order-preserving call accumulator with scoped cleanup —
//!   dropping an unsent batch discards it without touching the wire

#![warn(missing_docs)]

pub mod batch;
pub mod transport;

pub use batch::{Batch, Channel, ChannelCall};
pub use transport::HostTransport;

/// A convenient type alias for `Result` with `E` = [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The underlying channel failed to execute a round trip.
	#[error("channel round trip failed: {0}")]
	Transport(String),
	/// The host answered with the wrong number of per-call results.
	#[error("host returned {got} results for {sent} calls")]
	ResultCount {
		/// Number of calls sent in the batch.
		sent: usize,
		/// Number of results the host returned.
		got: usize,
	},
}
