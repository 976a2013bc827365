//! Text-property type registry.
//!
//! Declares the fixed set of property types the engine attaches (one
//! diagnostic and one hover type per severity, plus the two fixed extras)
//! and removes all instances of a kind across loaded buffers. Field names in
//! the wire dictionaries are stable host-protocol names.

use limn_channel::{Batch, Channel};
use limn_primitives::{Buffer, Range, Severity, TextPropKind};
use serde::Serialize;
use serde_json::json;

use crate::{Error, Result};

/// Remote procedure declaring a property type.
pub const METHOD_DECLARE: &str = "declare-property-type";
/// Remote procedure attaching a property instance.
pub const METHOD_ADD: &str = "add-property";
/// Remote procedure removing property instances.
pub const METHOD_REMOVE: &str = "remove-properties";

/// Highlight group for symbol-reference properties.
pub const REFERENCES_HIGHLIGHT: &str = "ReferencesHighlight";
/// Highlight group marking the diagnostic source range under a hover.
pub const HOVER_DIAG_SRC_HIGHLIGHT: &str = "HoverDiagSrcHighlight";

/// Display attributes of a property type, in wire form.
///
/// Property type names reuse the highlight group name, even though they are
/// distinct host concepts.
#[derive(Debug, Clone, Serialize)]
pub struct PropType {
	/// Base highlight group.
	pub highlight: &'static str,
	/// Combine with syntax highlighting underneath.
	#[serde(skip_serializing_if = "is_false")]
	pub combine: bool,
	/// Display priority; higher wins.
	#[serde(skip_serializing_if = "is_zero")]
	pub priority: i64,
	/// Extend the property when text is inserted at its start.
	#[serde(skip_serializing_if = "is_false")]
	pub start_incl: bool,
	/// Extend the property when text is inserted at its end.
	#[serde(skip_serializing_if = "is_false")]
	pub end_incl: bool,
}

fn is_false(value: &bool) -> bool {
	!*value
}

fn is_zero(value: &i64) -> bool {
	*value == 0
}

/// Arguments of a property-add call, in wire form.
#[derive(Debug, Clone, Serialize)]
pub struct PropAdd {
	/// Property type name.
	#[serde(rename = "type")]
	pub prop_type: &'static str,
	/// Property kind id.
	pub id: i64,
	/// End line, 1-based.
	pub end_lnum: u32,
	/// End column, one past the last highlighted character.
	pub end_col: u32,
	/// Host buffer number.
	pub bufnr: i64,
}

/// One property type to declare: name plus display attributes.
#[derive(Debug, Clone)]
pub struct PropTypeSpec {
	/// Property type name.
	pub name: &'static str,
	/// Display attributes.
	pub dict: PropType,
}

fn combined(highlight: &'static str, priority: i64) -> PropTypeSpec {
	PropTypeSpec {
		name: highlight,
		dict: PropType {
			highlight,
			combine: true,
			priority,
			start_incl: false,
			end_incl: false,
		},
	}
}

/// The fixed declaration set, in declaration order.
///
/// For each severity its diagnostic type then its hover type, followed by
/// the hover-diagnostic-source and reference types. Declared once at
/// startup, before either highlighter runs.
pub fn property_types() -> Vec<PropTypeSpec> {
	let mut specs = Vec::with_capacity(Severity::ALL.len() * 2 + 2);
	for severity in Severity::ALL {
		specs.push(combined(severity.highlight(), severity.priority()));
		specs.push(combined(severity.hover_highlight(), severity.priority()));
	}
	let extra_priority = Severity::Error.priority() + 1;
	specs.push(combined(HOVER_DIAG_SRC_HIGHLIGHT, extra_priority));
	specs.push(combined(REFERENCES_HIGHLIGHT, extra_priority));
	specs
}

/// Declares every property type in one batch.
///
/// Fails with [`Error::PropertyDeclaration`] if the host rejects any
/// declaration (non-zero status). Rejection is not special-cased for
/// re-declaration; the registry runs once per process.
pub async fn declare_property_types(channel: &mut Channel) -> Result<()> {
	let specs = property_types();
	let mut batch = channel.batch();
	for spec in &specs {
		batch.call(
			METHOD_DECLARE,
			vec![json!(spec.name), serde_json::to_value(&spec.dict)?],
		);
	}
	let results = batch.send().await?;
	for (spec, result) in specs.iter().zip(&results) {
		if result.as_i64().unwrap_or(-1) != 0 {
			return Err(Error::PropertyDeclaration { name: spec.name });
		}
	}
	Ok(())
}

/// Queues removal of all instances of `kind` into an open batch, one call
/// per loaded buffer.
///
/// Unloaded buffers are skipped: the host discards their properties on
/// unload and errors on removal calls against them.
pub fn queue_remove_all(batch: &mut Batch<'_>, buffers: &[Buffer], kind: TextPropKind) {
	for buffer in buffers.iter().filter(|b| b.loaded) {
		batch.call(
			METHOD_REMOVE,
			vec![json!({ "id": kind.id(), "bufnr": buffer.num, "all": 1 })],
		);
	}
}

/// Removes all instances of `kind` across loaded buffers in its own batch.
///
/// Idempotent; the per-call removal counts are ignored.
pub async fn remove_all_instances(
	channel: &mut Channel,
	buffers: &[Buffer],
	kind: TextPropKind,
) -> Result<()> {
	let mut batch = channel.batch();
	queue_remove_all(&mut batch, buffers, kind);
	batch.send().await?;
	Ok(())
}

/// Queues one property-add call for `range` in `bufnr`.
pub(crate) fn queue_add(
	batch: &mut Batch<'_>,
	prop_type: &'static str,
	kind: TextPropKind,
	range: Range,
	bufnr: i64,
) -> Result<()> {
	let dict = PropAdd {
		prop_type,
		id: kind.id(),
		end_lnum: range.end.line,
		end_col: range.end.col,
		bufnr,
	};
	batch.call(
		METHOD_ADD,
		vec![
			json!(range.start.line),
			json!(range.start.col),
			serde_json::to_value(&dict)?,
		],
	);
	Ok(())
}
