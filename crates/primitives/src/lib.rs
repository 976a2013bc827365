//! Core types for highlight synchronization: cursor-space geometry,
//! diagnostic severities, buffers, and text-property kinds.

/// Buffer identity as tracked by the host editor.
pub mod buffer;
/// Diagnostics produced by the language backend.
pub mod diagnostic;
/// 1-based cursor-space points and ranges.
pub mod point;
/// Text-property kinds attached to buffer ranges.
pub mod prop;
/// The fixed severity table: highlight groups and priorities.
pub mod severity;

pub use buffer::Buffer;
pub use diagnostic::Diagnostic;
pub use point::{Point, Range};
pub use prop::TextPropKind;
pub use severity::Severity;
