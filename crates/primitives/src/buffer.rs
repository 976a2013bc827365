use lsp_types::Uri;

/// A buffer as tracked by the host editor.
///
/// Owned by the external buffer-tracking collaborator; the highlight engine
/// only reads snapshots. Properties can only be attached to loaded buffers —
/// the host errors on adds to unloaded ones and discards their properties on
/// unload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
	/// Host buffer number.
	pub num: i64,
	/// Whether the buffer is currently loaded in the host.
	pub loaded: bool,
	/// Document URI, as the language backend addresses it.
	pub uri: Uri,
}

impl Buffer {
	/// Creates a new buffer description.
	pub fn new(num: i64, loaded: bool, uri: Uri) -> Self {
		Self { num, loaded, uri }
	}
}
