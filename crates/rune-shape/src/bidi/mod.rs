//! Bidirectional (BiDi) text support built on `unicode-bidi`.
//!
//! - Paragraph-level direction detection
//! - Directional runs of a layout range in visual order
//! - The run list a layout call walks, including fallback requests

pub mod levels;
pub mod runs;

pub use levels::{BaseDirection, ParagraphBidi, paragraph_bidi_info, resolve_base_direction};
pub use runs::{BidiRun, BidiRunSource, LayoutRuns, visual_runs};
