use lsp_types::DiagnosticSeverity;

use crate::point::Range;

/// A diagnostic produced by the language backend, already resolved to host
/// buffer coordinates.
///
/// Consumed, never mutated, by the diagnostic highlighter. The severity
/// stays in wire form; resolution against the severity table happens at
/// highlight time so a backend/table mismatch is observable there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// Host buffer number, or a negative value for "not attached to an open
	/// buffer".
	pub buf: i64,
	/// The span the diagnostic covers.
	pub range: Range,
	/// Wire-form severity.
	pub severity: DiagnosticSeverity,
}

impl Diagnostic {
	/// Creates a new diagnostic.
	pub fn new(buf: i64, range: Range, severity: DiagnosticSeverity) -> Self {
		Self {
			buf,
			range,
			severity,
		}
	}

	/// Returns true if this diagnostic is not attached to an open buffer.
	pub fn buffer_unknown(&self) -> bool {
		self.buf < 0
	}
}
