//! Shaping of homogeneous subruns.
//!
//! [`ShapingEngine`] is the seam to the external shaper: it shapes one
//! subrun of a single script in a single direction and reports glyphs in
//! 26.6 fixed point. [`HarfrustEngine`] is the implementation used for real
//! fonts.

pub mod shaped_run;
pub mod shaper;
pub mod subrun;

use std::borrow::Cow;

use crate::font::GlyphClassSource;

pub use shaped_run::{Direction, ShapeRequest, ShapedGlyph};
pub use shaper::HarfrustEngine;
pub use subrun::{Subrun, Subruns, script_subruns};

/// Shapes one subrun at a time.
///
/// Calls are independent: nothing carries over from one subrun to the
/// next. Glyphs come back in visual order for the requested direction.
pub trait ShapingEngine {
    fn shape(&mut self, text: &str, request: &ShapeRequest<'_>) -> Vec<ShapedGlyph>;

    /// Glyph class metadata of the font, when it has any.
    fn glyph_classes(&self) -> Option<&dyn GlyphClassSource> {
        None
    }

    /// Whether Unicode general categories can be consulted for characters.
    fn has_unicode_categories(&self) -> bool {
        true
    }
}

/// Language tag handed to the shaper.
///
/// Chinese keeps its full tag since the region/script picks the glyph
/// variants; every other language is reduced to its primary subtag.
pub fn shaping_language(tag: &str) -> Cow<'_, str> {
    let primary = tag.split(['-', '_']).next().unwrap_or("");
    if primary.eq_ignore_ascii_case("zh") {
        if tag.contains('_') {
            Cow::Owned(tag.replace('_', "-"))
        } else {
            Cow::Borrowed(tag)
        }
    } else {
        Cow::Borrowed(primary)
    }
}
