use lsp_types::DiagnosticSeverity;

/// Diagnostic severity with a fixed, process-wide display mapping.
///
/// Each severity maps to a diagnostic highlight group, a hover highlight
/// group, and a priority (higher wins visually). The mapping is immutable;
/// backends speak [`DiagnosticSeverity`] on the wire and an unlisted wire
/// value is a data-contract mismatch the caller must surface, which is why
/// [`Severity::from_lsp`] is partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
	/// An error.
	Error,
	/// A warning.
	Warning,
	/// Informational.
	Info,
	/// A hint.
	Hint,
}

impl Severity {
	/// All severities, in the fixed declaration/iteration order.
	pub const ALL: [Severity; 4] = [
		Severity::Error,
		Severity::Warning,
		Severity::Info,
		Severity::Hint,
	];

	/// The highlight group used for diagnostic squiggles of this severity.
	pub const fn highlight(self) -> &'static str {
		match self {
			Severity::Error => "ErrorHighlight",
			Severity::Warning => "WarningHighlight",
			Severity::Info => "InfoHighlight",
			Severity::Hint => "HintHighlight",
		}
	}

	/// The highlight group used when hovering a diagnostic of this severity.
	pub const fn hover_highlight(self) -> &'static str {
		match self {
			Severity::Error => "ErrorHoverHighlight",
			Severity::Warning => "WarningHoverHighlight",
			Severity::Info => "InfoHoverHighlight",
			Severity::Hint => "HintHoverHighlight",
		}
	}

	/// Display priority; higher wins when properties overlap.
	pub const fn priority(self) -> i64 {
		match self {
			Severity::Error => 7,
			Severity::Warning => 5,
			Severity::Info => 3,
			Severity::Hint => 1,
		}
	}

	/// Maps a wire-form severity onto the table.
	///
	/// Returns `None` for values outside the table.
	pub fn from_lsp(severity: DiagnosticSeverity) -> Option<Severity> {
		match severity {
			DiagnosticSeverity::ERROR => Some(Severity::Error),
			DiagnosticSeverity::WARNING => Some(Severity::Warning),
			DiagnosticSeverity::INFORMATION => Some(Severity::Info),
			DiagnosticSeverity::HINT => Some(Severity::Hint),
			_ => None,
		}
	}
}
