//! Glyph layout of one text range with one font.
//!
//! [`LayoutArgs`] carries the caller's state, [`TextShaper`] turns it into a
//! [`GlyphLayout`]. Script runs are computed once per text and shared
//! through [`TextLayoutCache`].

pub mod args;
pub mod cache;
pub mod classify;
pub mod glyph;
pub mod text_layout;

pub use args::{LayoutArgs, LayoutFlags};
pub use cache::TextLayoutCache;
pub use classify::{ClusterTracker, is_diacritic};
pub use glyph::{GlyphFlags, GlyphItem, GlyphLayout, Point};
pub use text_layout::{TextShaper, layout_glyphs};
