//! Diagnostic squiggle synchronization.
//!
//! Diagnostics are redrawn with a full clear-then-re-add per refresh rather
//! than an incremental diff: redundant redraw work is cheap next to staying
//! correct under out-of-order diagnostic batches.

use std::sync::Arc;

use limn_channel::Channel;
use limn_primitives::{Diagnostic, Severity, TextPropKind};
use parking_lot::Mutex;
use tracing::debug;

use crate::config::HighlightConfig;
use crate::store::BufferStore;
use crate::{Error, Result, props};

/// Cross-thread handle that marks diagnostics as changed.
///
/// Cloneable into whatever context learns about recomputed diagnostics
/// (typically a backend notification handler off the main context). The
/// flag is the engine's only cross-thread shared state.
#[derive(Debug, Clone)]
pub struct DiagnosticsNotifier {
	changed: Arc<Mutex<bool>>,
}

impl DiagnosticsNotifier {
	/// Marks diagnostics as changed; the next refresh will redraw.
	pub fn mark_changed(&self) {
		*self.changed.lock() = true;
	}
}

/// Converts the current diagnostic list into property-add commands.
pub struct DiagnosticHighlighter {
	enabled: bool,
	changed: Arc<Mutex<bool>>,
}

impl DiagnosticHighlighter {
	/// Creates a highlighter with the given feature flags.
	pub fn new(config: &HighlightConfig) -> Self {
		Self {
			enabled: config.diagnostics_enabled(),
			changed: Arc::new(Mutex::new(false)),
		}
	}

	/// Returns a handle for marking diagnostics changed.
	pub fn notifier(&self) -> DiagnosticsNotifier {
		DiagnosticsNotifier {
			changed: self.changed.clone(),
		}
	}

	/// Redraws diagnostic highlights from `diagnostics`.
	///
	/// No-op when disabled, and when neither `force` nor the dirty flag is
	/// set (the flag is consumed atomically either way). Removes every
	/// existing diagnostic property, then re-adds one property per
	/// diagnostic whose buffer is known and loaded. A severity outside the
	/// fixed table aborts the refresh with [`Error::UnknownSeverity`]; the
	/// open batch is discarded unsent.
	pub async fn refresh(
		&self,
		channel: &mut Channel,
		store: &dyn BufferStore,
		diagnostics: &[Diagnostic],
		force: bool,
	) -> Result<()> {
		if !self.enabled {
			return Ok(());
		}
		let work = {
			let mut changed = self.changed.lock();
			std::mem::take(&mut *changed)
		};
		if !force && !work {
			return Ok(());
		}

		debug!(diagnostics = diagnostics.len(), force, "redrawing diagnostic highlights");
		let buffers = store.buffers();
		props::remove_all_instances(channel, &buffers, TextPropKind::Diagnostic).await?;

		let mut batch = channel.batch();
		for diagnostic in diagnostics {
			if diagnostic.buffer_unknown() {
				continue;
			}
			// Adds against an unloaded buffer make the host error out.
			if let Some(buffer) = store.get(diagnostic.buf)
				&& !buffer.loaded
			{
				continue;
			}
			let severity = Severity::from_lsp(diagnostic.severity)
				.ok_or(Error::UnknownSeverity(diagnostic.severity))?;
			props::queue_add(
				&mut batch,
				severity.highlight(),
				TextPropKind::Diagnostic,
				diagnostic.range,
				diagnostic.buf,
			)?;
		}
		batch.send().await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex as StdMutex;

	use async_trait::async_trait;
	use limn_channel::{ChannelCall, HostTransport};
	use limn_primitives::{Buffer, Point, Range};
	use lsp_types::DiagnosticSeverity;
	use serde_json::{Value, json};

	use super::*;
	use crate::store::PositionError;

	#[derive(Default)]
	struct RecordingTransport {
		batches: StdMutex<Vec<Vec<ChannelCall>>>,
	}

	impl RecordingTransport {
		fn calls(&self) -> Vec<ChannelCall> {
			self.batches.lock().unwrap().iter().flatten().cloned().collect()
		}
	}

	#[async_trait]
	impl HostTransport for RecordingTransport {
		async fn send_batch(
			&self,
			calls: Vec<ChannelCall>,
		) -> limn_channel::Result<Vec<Value>> {
			let results = calls.iter().map(|_| json!(0)).collect();
			self.batches.lock().unwrap().push(calls);
			Ok(results)
		}
	}

	struct StaticStore {
		buffers: Vec<Buffer>,
	}

	impl BufferStore for StaticStore {
		fn buffers(&self) -> Vec<Buffer> {
			self.buffers.clone()
		}

		fn get(&self, num: i64) -> Option<Buffer> {
			self.buffers.iter().find(|b| b.num == num).cloned()
		}

		fn cursor(&self) -> Result<(Buffer, Point), PositionError> {
			Err(PositionError("no cursor".into()))
		}

		fn point_from_position(
			&self,
			_buffer: &Buffer,
			position: lsp_types::Position,
		) -> Result<Point, PositionError> {
			Ok(Point::new(position.line + 1, position.character + 1))
		}

		fn position_from_point(
			&self,
			_buffer: &Buffer,
			point: Point,
		) -> Result<lsp_types::Position, PositionError> {
			Ok(lsp_types::Position::new(point.line - 1, point.col - 1))
		}
	}

	fn buffer(num: i64, loaded: bool) -> Buffer {
		Buffer::new(num, loaded, "file:///main.rs".parse().unwrap())
	}

	fn diagnostic(buf: i64, severity: DiagnosticSeverity) -> Diagnostic {
		Diagnostic::new(
			buf,
			Range::new(Point::new(1, 1), Point::new(1, 5)),
			severity,
		)
	}

	fn enabled() -> HighlightConfig {
		HighlightConfig {
			highlight_diagnostics: Some(true),
			highlight_references: None,
		}
	}

	fn setup() -> (Arc<RecordingTransport>, Channel, StaticStore) {
		let transport = Arc::new(RecordingTransport::default());
		let channel = Channel::new(transport.clone());
		let store = StaticStore {
			buffers: vec![buffer(3, true)],
		};
		(transport, channel, store)
	}

	#[tokio::test]
	async fn test_disabled_is_a_noop() {
		let (transport, mut channel, store) = setup();
		let highlighter = DiagnosticHighlighter::new(&HighlightConfig::default());

		let diags = vec![diagnostic(3, DiagnosticSeverity::ERROR)];
		highlighter.refresh(&mut channel, &store, &diags, true).await.unwrap();

		assert!(transport.calls().is_empty());
	}

	#[tokio::test]
	async fn test_refresh_without_change_or_force_is_a_noop() {
		let (transport, mut channel, store) = setup();
		let highlighter = DiagnosticHighlighter::new(&enabled());

		let diags = vec![diagnostic(3, DiagnosticSeverity::ERROR)];
		highlighter.refresh(&mut channel, &store, &diags, false).await.unwrap();

		assert!(transport.calls().is_empty());
	}

	#[tokio::test]
	async fn test_mark_changed_arms_exactly_one_refresh() {
		let (transport, mut channel, store) = setup();
		let highlighter = DiagnosticHighlighter::new(&enabled());
		let diags = vec![diagnostic(3, DiagnosticSeverity::ERROR)];

		highlighter.notifier().mark_changed();
		highlighter.refresh(&mut channel, &store, &diags, false).await.unwrap();
		let after_first = transport.calls().len();
		assert!(after_first > 0);

		// Flag was consumed; nothing further happens.
		highlighter.refresh(&mut channel, &store, &diags, false).await.unwrap();
		assert_eq!(transport.calls().len(), after_first);
	}

	#[tokio::test]
	async fn test_refresh_clears_then_adds() {
		let (transport, mut channel, store) = setup();
		let highlighter = DiagnosticHighlighter::new(&enabled());
		let diags = vec![diagnostic(3, DiagnosticSeverity::ERROR)];

		highlighter.refresh(&mut channel, &store, &diags, true).await.unwrap();

		let calls = transport.calls();
		assert_eq!(calls.len(), 2);
		assert_eq!(calls[0].method, props::METHOD_REMOVE);
		assert_eq!(
			calls[0].args[0],
			json!({ "id": TextPropKind::Diagnostic.id(), "bufnr": 3, "all": 1 })
		);
		assert_eq!(calls[1].method, props::METHOD_ADD);
		assert_eq!(calls[1].args[0], json!(1));
		assert_eq!(calls[1].args[1], json!(1));
		assert_eq!(
			calls[1].args[2],
			json!({
				"type": "ErrorHighlight",
				"id": TextPropKind::Diagnostic.id(),
				"end_lnum": 1,
				"end_col": 5,
				"bufnr": 3
			})
		);
	}

	#[tokio::test]
	async fn test_unknown_and_unloaded_buffers_get_no_adds() {
		let transport = Arc::new(RecordingTransport::default());
		let mut channel = Channel::new(transport.clone());
		let store = StaticStore {
			buffers: vec![buffer(3, true), buffer(4, false)],
		};
		let highlighter = DiagnosticHighlighter::new(&enabled());

		let diags = vec![
			diagnostic(-1, DiagnosticSeverity::ERROR),
			diagnostic(4, DiagnosticSeverity::WARNING),
		];
		highlighter.refresh(&mut channel, &store, &diags, true).await.unwrap();

		let calls = transport.calls();
		assert!(calls.iter().all(|c| c.method == props::METHOD_REMOVE));
	}

	#[tokio::test]
	async fn test_unknown_severity_aborts_without_adds() {
		let (transport, mut channel, store) = setup();
		let highlighter = DiagnosticHighlighter::new(&enabled());

		let unknown: DiagnosticSeverity = serde_json::from_value(json!(99)).unwrap();
		let diags = vec![diagnostic(3, unknown)];
		let err = highlighter
			.refresh(&mut channel, &store, &diags, true)
			.await
			.unwrap_err();

		assert!(matches!(err, Error::UnknownSeverity(_)));
		// The clear went out; the add batch was discarded unsent.
		let calls = transport.calls();
		assert!(!calls.is_empty());
		assert!(calls.iter().all(|c| c.method == props::METHOD_REMOVE));
	}
}
