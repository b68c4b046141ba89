//! Per-glyph classification while walking shaped output.

use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

use crate::font::{GlyphClass, GlyphClassSource};
use crate::shaping::ShapedGlyph;
use crate::unicode::BoundaryAnalyzer;

/// Tracks the grapheme cluster of the glyphs of one subrun.
///
/// A glyph opens a new cluster when its character lies outside the cluster
/// seen so far: before its start for right-to-left output, at or past its
/// end for left-to-right output. Every other glyph is in-cluster.
#[derive(Debug, Clone)]
pub struct ClusterTracker {
    rtl: bool,
    start: usize,
    end: usize,
}

impl ClusterTracker {
    pub fn new(rtl: bool) -> Self {
        Self {
            rtl,
            start: usize::MAX,
            end: 0,
        }
    }

    /// Feed the glyph at byte `pos`; returns whether it continues the
    /// current cluster.
    pub fn in_cluster(&mut self, text: &str, pos: usize, boundaries: &dyn BoundaryAnalyzer) -> bool {
        if self.rtl && pos < self.start {
            self.start = boundaries.previous_boundary(text, pos + char_len(text, pos));
            false
        } else if !self.rtl && pos >= self.end {
            self.end = boundaries.next_boundary(text, pos);
            false
        } else {
            true
        }
    }
}

/// Byte length of the character at `pos`, 1 when `pos` is not on one.
pub(crate) fn char_len(text: &str, pos: usize) -> usize {
    char_at(text, pos).map_or(1, char::len_utf8)
}

pub(crate) fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|rest| rest.chars().next())
}

/// Whether a glyph is a combining mark.
///
/// Font glyph classes win when present: a zero-width mark glyph. Without
/// them the character's general category decides (nonspacing mark). When
/// neither source is available any zero-advance glyph counts, which also
/// catches zero-width non-marks.
pub fn is_diacritic(
    classes: Option<&dyn GlyphClassSource>,
    unicode_categories: bool,
    glyph: &ShapedGlyph,
    ch: Option<char>,
) -> bool {
    if let Some(classes) = classes.filter(|c| c.has_glyph_classes()) {
        return classes.glyph_class(glyph.glyph_id) == GlyphClass::Mark && glyph.x_advance == 0;
    }
    if unicode_categories {
        return ch.is_some_and(|ch| ch.general_category() == GeneralCategory::NonspacingMark);
    }
    glyph.x_advance == 0
}
