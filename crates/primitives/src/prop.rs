/// The kinds of text property the engine attaches to buffers.
///
/// Individual property instances are anonymous; the engine only ever
/// removes "all instances of kind K in buffer B" as an atomic unit, so a
/// kind is identified by a stable integer id on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextPropKind {
	/// Diagnostic squiggles.
	Diagnostic,
	/// Symbol-reference highlights.
	Reference,
}

impl TextPropKind {
	/// The wire id for this kind.
	pub const fn id(self) -> i64 {
		match self {
			TextPropKind::Diagnostic => 1,
			TextPropKind::Reference => 2,
		}
	}
}
