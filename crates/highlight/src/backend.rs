use async_trait::async_trait;
use lsp_types::{DocumentHighlight, Position, Uri};

/// Error from the language backend.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
	/// The request was cancelled before completion.
	///
	/// An expected outcome for superseded queries, distinct from every
	/// other failure; callers discard it silently.
	#[error("request cancelled")]
	Cancelled,
	/// Any other backend failure.
	#[error("{0}")]
	Backend(String),
}

/// The language backend's reference-lookup capability.
///
/// The query may block for an unbounded time, so it is always issued from a
/// background task, never the main context.
#[async_trait]
pub trait HighlightProvider: Send + Sync {
	/// Returns the highlight ranges for the symbol at `position`, or `None`
	/// if the backend has nothing to report.
	async fn document_highlight(
		&self,
		uri: Uri,
		position: Position,
	) -> Result<Option<Vec<DocumentHighlight>>, ProviderError>;
}
