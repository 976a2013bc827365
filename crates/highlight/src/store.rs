use limn_primitives::{Buffer, Point};
use lsp_types::Position;

/// Error from the buffer collaborator while resolving a position.
///
/// Typically means the buffer changed underneath a conversion, or the host
/// has no current cursor to report.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PositionError(pub String);

/// Read-only view of the host's buffer state.
///
/// Implemented by the buffer-tracking collaborator, which owns buffer
/// contents and the line/column<->byte conversions the engine must not
/// reimplement. Called from the main context only.
pub trait BufferStore {
	/// Snapshot of the currently open buffers.
	fn buffers(&self) -> Vec<Buffer>;

	/// Looks up a buffer by host number.
	fn get(&self, num: i64) -> Option<Buffer>;

	/// The current buffer and cursor point.
	fn cursor(&self) -> Result<(Buffer, Point), PositionError>;

	/// Converts a backend position into a buffer-local point.
	fn point_from_position(
		&self,
		buffer: &Buffer,
		position: Position,
	) -> Result<Point, PositionError>;

	/// Converts a buffer-local point into a backend position.
	fn position_from_point(
		&self,
		buffer: &Buffer,
		point: Point,
	) -> Result<Position, PositionError>;
}
