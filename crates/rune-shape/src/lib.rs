//! rune-shape: complex text layout on top of harfrust.
//!
//! Turns a range of a Unicode string into positioned glyphs for one font:
//! - script run segmentation with bracket pairing (`script`)
//! - bidi runs in visual order and fallback bookkeeping (`bidi`)
//! - per-subrun shaping through a pluggable engine (`shaping`)
//! - glyph positioning and cluster/diacritic classification (`layout`)

pub mod bidi;
pub mod error;
pub mod font;
pub mod layout;
pub mod script;
pub mod shaping;
pub mod unicode;

pub use error::{LayoutError, Result};
pub use font::{FontError, FontFace, FontHandle, FontSelection, ScaledFontMetrics, TableFace, open_font};
pub use layout::{
    GlyphFlags, GlyphItem, GlyphLayout, LayoutArgs, LayoutFlags, Point, TextLayoutCache, TextShaper,
};
pub use shaping::{HarfrustEngine, ShapingEngine};
