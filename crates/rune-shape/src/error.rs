//! Error types for layout calls.

use thiserror::Error;

use crate::font::FontError;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Failures that stop a layout call from producing glyphs.
///
/// Missing glyphs and empty runs are not errors; they are absorbed inside
/// the layout call.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The font could not be turned into a shaping face.
    #[error(transparent)]
    Font(#[from] FontError),

    /// Requested range is out of bounds or splits a character.
    #[error("invalid layout range {start}..{end} for text of {len} bytes")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// A DX array must hold one entry per character of the range.
    #[error("DX array has {actual} entries for {expected} characters")]
    InvalidDxArray { expected: usize, actual: usize },

    /// The shaping engine rejected the face.
    #[error("shaping engine failed: {0}")]
    Engine(String),
}
