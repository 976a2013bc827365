//! Single-flight reference highlight queries.
//!
//! A cursor move while the editor is busy only decides whether the existing
//! highlight survives (flicker suppression) or is cleared. Once the editor
//! goes idle the controller issues one asynchronous document-highlight
//! query, cancelling whatever query was still outstanding so at most one
//! response is ever applied.
//!
//! Queries run on background tasks because the backend may block for an
//! unbounded time. A task never mutates controller state; it sends a
//! [`ReferenceResult`] back over an internal channel, and the owner drains
//! that channel on the main context and feeds each result to
//! [`ReferenceController::apply`], the single consumption point.

use std::sync::Arc;

use limn_channel::Channel;
use limn_primitives::{Buffer, Point, Range, TextPropKind};
use lsp_types::DocumentHighlight;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Result;
use crate::backend::{HighlightProvider, ProviderError};
use crate::config::HighlightConfig;
use crate::props::{self, REFERENCES_HIGHLIGHT};
use crate::store::BufferStore;

/// A completed reference query, handed back to the main context.
#[derive(Debug)]
pub struct ReferenceResult {
	/// Generation at query issue time; stale generations are dropped.
	pub generation: u64,
	/// Buffer the query ran against.
	pub buffer: Buffer,
	/// Cursor point captured at issue time, not re-read on completion.
	pub cursor: Point,
	/// Ranges reported by the backend.
	pub highlights: Vec<DocumentHighlight>,
}

/// Owns the reference-highlight lifecycle for one process.
pub struct ReferenceController {
	enabled: bool,
	provider: Arc<dyn HighlightProvider>,
	/// The range the cursor currently sits in, if any. `None` or exactly
	/// the range from the most recent non-superseded query.
	current: Option<Range>,
	cancel: Option<CancellationToken>,
	generation: u64,
	events_tx: mpsc::UnboundedSender<ReferenceResult>,
	events_rx: mpsc::UnboundedReceiver<ReferenceResult>,
}

impl ReferenceController {
	/// Creates a controller with the given feature flags and backend.
	pub fn new(config: &HighlightConfig, provider: Arc<dyn HighlightProvider>) -> Self {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		Self {
			enabled: config.references_enabled(),
			provider,
			current: None,
			cancel: None,
			generation: 0,
			events_tx,
			events_rx,
		}
	}

	/// The range currently highlighted as containing the cursor, if any.
	pub fn current_reference(&self) -> Option<Range> {
		self.current
	}

	/// Handles a cursor move.
	///
	/// `refresh` is the caller's idleness verdict: false while the user is
	/// busy (highlights are kept only if the cursor stays inside the
	/// current range, removed otherwise), true once the editor has gone
	/// idle (a fresh query is issued, superseding any outstanding one).
	pub async fn cursor_moved(
		&mut self,
		channel: &mut Channel,
		store: &dyn BufferStore,
		refresh: bool,
	) -> Result<()> {
		if !self.enabled {
			return Ok(());
		}
		let (buffer, cursor) = store.cursor()?;

		if !refresh {
			if let Some(current) = &self.current
				&& cursor.is_within(current)
			{
				// Still inside the highlighted span; removing and re-adding
				// would only flicker.
				return Ok(());
			}
			self.current = None;
			props::remove_all_instances(channel, &store.buffers(), TextPropKind::Reference)
				.await?;
			return Ok(());
		}

		let position = store.position_from_point(&buffer, cursor)?;

		// Only the latest response may be applied: cancel the outstanding
		// query before issuing a new one.
		if let Some(cancel) = self.cancel.take() {
			cancel.cancel();
		}
		let cancel = CancellationToken::new();
		self.cancel = Some(cancel.clone());
		self.generation = self.generation.wrapping_add(1);
		let generation = self.generation;

		let uri = buffer.uri.clone();
		let provider = self.provider.clone();
		let events_tx = self.events_tx.clone();
		debug!(generation, buf = buffer.num, "issuing document highlight query");

		tokio::spawn(async move {
			let result = tokio::select! {
				_ = cancel.cancelled() => return,
				result = provider.document_highlight(uri, position) => result,
			};
			// A newer query may have cancelled this one while the backend
			// call was completing; such races are expected, not errors.
			if cancel.is_cancelled() {
				return;
			}
			let highlights = match result {
				Ok(Some(highlights)) => highlights,
				Ok(None) => Vec::new(),
				Err(ProviderError::Cancelled) => return,
				Err(err) => {
					warn!(error = %err, "document highlight request failed");
					return;
				}
			};
			let _ = events_tx.send(ReferenceResult {
				generation,
				buffer,
				cursor,
				highlights,
			});
		});
		Ok(())
	}

	/// Returns a completed query result if one is waiting.
	pub fn try_recv_result(&mut self) -> Option<ReferenceResult> {
		self.events_rx.try_recv().ok()
	}

	/// Waits for the next completed query result.
	pub async fn recv_result(&mut self) -> Option<ReferenceResult> {
		self.events_rx.recv().await
	}

	/// Applies a completed query result. Main context only.
	///
	/// Results from superseded queries are dropped. Otherwise the previous
	/// reference highlight (if any) is cleared, then every returned range
	/// is converted to buffer-local points and re-added in one batch; the
	/// range containing the captured cursor point becomes the current
	/// reference. A conversion failure is logged and abandons the rest of
	/// the application, discarding the open batch unsent.
	pub async fn apply(
		&mut self,
		channel: &mut Channel,
		store: &dyn BufferStore,
		result: ReferenceResult,
	) -> Result<()> {
		if result.generation != self.generation {
			return Ok(());
		}
		// The query finished; a later cursor move must not cancel a dead
		// token.
		self.cancel = None;

		if self.current.take().is_some() {
			props::remove_all_instances(channel, &store.buffers(), TextPropKind::Reference)
				.await?;
		}

		let mut batch = channel.batch();
		for highlight in &result.highlights {
			let start = match store.point_from_position(&result.buffer, highlight.range.start) {
				Ok(start) => start,
				Err(err) => {
					warn!(error = %err, "failed to convert highlight start position");
					return Ok(());
				}
			};
			let end = match store.point_from_position(&result.buffer, highlight.range.end) {
				Ok(end) => end,
				Err(err) => {
					warn!(error = %err, "failed to convert highlight end position");
					return Ok(());
				}
			};
			let range = Range::new(start, end);
			if result.cursor.is_within(&range) {
				self.current = Some(range);
			}
			props::queue_add(
				&mut batch,
				REFERENCES_HIGHLIGHT,
				TextPropKind::Reference,
				range,
				result.buffer.num,
			)?;
		}
		batch.send().await?;
		Ok(())
	}
}
