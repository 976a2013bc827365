use serde::Deserialize;

/// Highlight feature flags, consumed read-only.
///
/// Loading and reloading are the host integration's concern; this is the
/// already-deserialized shape. Unset flags mean disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
	/// Enables diagnostic squiggle highlighting.
	pub highlight_diagnostics: Option<bool>,
	/// Enables symbol-reference highlighting on cursor idle.
	pub highlight_references: Option<bool>,
}

impl HighlightConfig {
	/// Returns true if diagnostic highlighting is enabled.
	pub fn diagnostics_enabled(&self) -> bool {
		self.highlight_diagnostics.unwrap_or(false)
	}

	/// Returns true if reference highlighting is enabled.
	pub fn references_enabled(&self) -> bool {
		self.highlight_references.unwrap_or(false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unset_flags_default_off() {
		let config = HighlightConfig::default();
		assert!(!config.diagnostics_enabled());
		assert!(!config.references_enabled());
	}

	#[test]
	fn test_deserialize_partial() {
		let config: HighlightConfig =
			serde_json::from_value(serde_json::json!({ "highlight_diagnostics": true })).unwrap();
		assert!(config.diagnostics_enabled());
		assert!(!config.references_enabled());
	}
}
