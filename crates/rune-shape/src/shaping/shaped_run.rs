use core::ops::Range;

use unicode_script::Script;

/// Direction a subrun is shaped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn from_rtl(rtl: bool) -> Self {
        if rtl { Direction::RightToLeft } else { Direction::LeftToRight }
    }

    pub fn is_rtl(self) -> bool {
        self == Direction::RightToLeft
    }
}

/// One homogeneous piece of text handed to the shaping engine.
#[derive(Debug, Clone)]
pub struct ShapeRequest<'a> {
    /// Byte range of the subrun in the full text.
    pub range: Range<usize>,
    pub direction: Direction,
    pub script: Script,
    /// BCP 47 language tag of the text.
    pub language: &'a str,
    /// The subrun starts at the beginning of the full text.
    pub start_of_text: bool,
    /// The subrun ends at the end of the full text.
    pub end_of_text: bool,
}

/// A glyph as produced by the shaping engine.
///
/// Advances and offsets are 26.6 fixed point; `cluster` is the byte offset
/// in the full text of the character the glyph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedGlyph {
    /// Zero when the font has no glyph for the character.
    pub glyph_id: u32,
    pub cluster: u32,
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}
