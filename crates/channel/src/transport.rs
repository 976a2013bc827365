//! Transport seam for the host-editor channel.

use async_trait::async_trait;
use serde_json::Value;

use crate::{ChannelCall, Result};

/// The underlying host-editor channel.
///
/// One [`send_batch`](HostTransport::send_batch) invocation is one round
/// trip: the transport executes every call in order and returns one result
/// per call, in the same order. RPC framing, dispatch, and retry policy all
/// live behind this trait.
#[async_trait]
pub trait HostTransport: Send + Sync {
	/// Executes `calls` as a single transaction and returns the per-call
	/// results in order.
	async fn send_batch(&self, calls: Vec<ChannelCall>) -> Result<Vec<Value>>;
}
