//! Call accumulation and transactional send.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::transport::HostTransport;
use crate::{Error, Result};

/// One remote procedure invocation: a method name and positional JSON
/// arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelCall {
	/// Remote procedure name.
	pub method: String,
	/// Positional arguments.
	pub args: Vec<Value>,
}

impl ChannelCall {
	/// Creates a new call.
	pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
		Self {
			method: method.into(),
			args,
		}
	}
}

/// Handle to the host-editor command channel.
///
/// All commands flow through batches obtained from [`Channel::batch`].
pub struct Channel {
	transport: Arc<dyn HostTransport>,
}

impl Channel {
	/// Creates a channel over the given transport.
	pub fn new(transport: Arc<dyn HostTransport>) -> Self {
		Self { transport }
	}

	/// Opens a new transaction.
	///
	/// The `&mut self` receiver is what makes "a transaction is already
	/// open" unrepresentable: a second batch cannot be opened while one is
	/// alive. The returned batch must either be [`sent`](Batch::send) or
	/// dropped; dropping discards the queued calls without a round trip.
	pub fn batch(&mut self) -> Batch<'_> {
		Batch {
			transport: &self.transport,
			calls: Vec::new(),
			sent: false,
		}
	}
}

impl std::fmt::Debug for Channel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Channel").finish_non_exhaustive()
	}
}

/// An open transaction: queued calls awaiting one round trip.
#[must_use = "an unsent batch is discarded on drop"]
pub struct Batch<'a> {
	transport: &'a Arc<dyn HostTransport>,
	calls: Vec<ChannelCall>,
	sent: bool,
}

impl Batch<'_> {
	/// Appends one call, order-preserving.
	pub fn call(&mut self, method: impl Into<String>, args: Vec<Value>) {
		self.calls.push(ChannelCall::new(method, args));
	}

	/// Returns the number of queued calls.
	pub fn len(&self) -> usize {
		self.calls.len()
	}

	/// Returns true if no calls are queued.
	pub fn is_empty(&self) -> bool {
		self.calls.is_empty()
	}

	/// Executes the queued calls as a single round trip and returns the
	/// per-call results in order.
	///
	/// A batch with zero queued calls short-circuits without touching the
	/// wire.
	pub async fn send(mut self) -> Result<Vec<Value>> {
		self.sent = true;
		if self.calls.is_empty() {
			return Ok(Vec::new());
		}
		let calls = std::mem::take(&mut self.calls);
		let sent = calls.len();
		let results = self.transport.send_batch(calls).await?;
		if results.len() != sent {
			return Err(Error::ResultCount {
				sent,
				got: results.len(),
			});
		}
		Ok(results)
	}
}

impl Drop for Batch<'_> {
	fn drop(&mut self) {
		if !self.sent && !self.calls.is_empty() {
			trace!(calls = self.calls.len(), "open batch dropped without send");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use async_trait::async_trait;
	use serde_json::json;

	use super::*;

	#[derive(Default)]
	struct RecordingTransport {
		round_trips: AtomicUsize,
		batches: Mutex<Vec<Vec<ChannelCall>>>,
	}

	#[async_trait]
	impl HostTransport for RecordingTransport {
		async fn send_batch(&self, calls: Vec<ChannelCall>) -> Result<Vec<Value>> {
			self.round_trips.fetch_add(1, Ordering::SeqCst);
			let results = calls.iter().map(|_| json!(0)).collect();
			self.batches.lock().unwrap().push(calls);
			Ok(results)
		}
	}

	#[tokio::test]
	async fn test_send_preserves_call_order() {
		let transport = Arc::new(RecordingTransport::default());
		let mut channel = Channel::new(transport.clone());

		let mut batch = channel.batch();
		batch.call("first", vec![json!(1)]);
		batch.call("second", vec![json!(2)]);
		let results = batch.send().await.unwrap();

		assert_eq!(results.len(), 2);
		let batches = transport.batches.lock().unwrap();
		assert_eq!(batches.len(), 1);
		assert_eq!(batches[0][0].method, "first");
		assert_eq!(batches[0][1].method, "second");
	}

	#[tokio::test]
	async fn test_empty_batch_short_circuits() {
		let transport = Arc::new(RecordingTransport::default());
		let mut channel = Channel::new(transport.clone());

		let results = channel.batch().send().await.unwrap();

		assert!(results.is_empty());
		assert_eq!(transport.round_trips.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_dropped_batch_sends_nothing() {
		let transport = Arc::new(RecordingTransport::default());
		let mut channel = Channel::new(transport.clone());

		let mut batch = channel.batch();
		batch.call("never-sent", vec![]);
		drop(batch);

		assert_eq!(transport.round_trips.load(Ordering::SeqCst), 0);
	}

	struct ShortTransport;

	#[async_trait]
	impl HostTransport for ShortTransport {
		async fn send_batch(&self, _calls: Vec<ChannelCall>) -> Result<Vec<Value>> {
			Ok(vec![json!(0)])
		}
	}

	#[tokio::test]
	async fn test_result_count_mismatch_is_error() {
		let mut channel = Channel::new(Arc::new(ShortTransport));

		let mut batch = channel.batch();
		batch.call("a", vec![]);
		batch.call("b", vec![]);

		assert!(matches!(
			batch.send().await,
			Err(Error::ResultCount { sent: 2, got: 1 })
		));
	}
}
