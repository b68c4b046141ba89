use core::ops::Range;

use unicode_segmentation::GraphemeCursor;

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Find the previous grapheme cluster boundary before `offset`.
///
/// If `offset` lies inside a grapheme cluster, this returns the start
/// of that cluster. If `offset` is exactly at a cluster boundary,
/// this returns the start of the previous cluster. Returns `None`
/// when there is no previous cluster.
pub fn prev_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = offset.min(text.len());
    if offset == 0 {
        return None;
    }
    // An offset inside a character is inside that character's cluster.
    if !text.is_char_boundary(offset) {
        return grapheme_start(text, floor_char_boundary(text, offset));
    }
    GraphemeCursor::new(offset, text.len(), true)
        .prev_boundary(text, 0)
        .ok()
        .flatten()
}

/// Find the next grapheme cluster boundary after `offset`.
///
/// If `offset` lies inside a grapheme cluster, this returns the end
/// of that cluster. If `offset` is exactly at a cluster boundary,
/// this returns the end of the next cluster. Returns `None` when
/// there is no next cluster.
pub fn next_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = floor_char_boundary(text, offset);
    if offset >= text.len() {
        return None;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .next_boundary(text, 0)
        .ok()
        .flatten()
}

/// Start of the cluster containing the character at `offset`.
fn grapheme_start(text: &str, offset: usize) -> Option<usize> {
    let mut cursor = GraphemeCursor::new(offset, text.len(), true);
    match cursor.is_boundary(text, 0) {
        Ok(true) => Some(offset),
        Ok(false) => cursor.prev_boundary(text, 0).ok().flatten(),
        Err(_) => None,
    }
}

/// User-perceived character boundaries, in "skip cell" mode: a base
/// character and everything combining with it move as one step.
pub trait BoundaryAnalyzer {
    /// Step back one grapheme from `pos`; `0` when there is nothing before it.
    fn previous_boundary(&self, text: &str, pos: usize) -> usize;

    /// Step forward one grapheme from `pos`; `text.len()` at the end.
    fn next_boundary(&self, text: &str, pos: usize) -> usize;

    /// Range of the grapheme containing the character at `pos`.
    ///
    /// `pos` inside a character counts as that character.
    fn grapheme_at(&self, text: &str, pos: usize) -> Range<usize> {
        let pos = floor_char_boundary(text, pos);
        if pos == text.len() {
            return pos..pos;
        }
        let char_end = text
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(pos, |c| pos + c.len_utf8());
        self.previous_boundary(text, char_end)..self.next_boundary(text, pos)
    }
}

/// Extended grapheme clusters per UAX #29.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemeBoundaries;

impl BoundaryAnalyzer for GraphemeBoundaries {
    fn previous_boundary(&self, text: &str, pos: usize) -> usize {
        prev_grapheme_boundary(text, pos).unwrap_or(0)
    }

    fn next_boundary(&self, text: &str, pos: usize) -> usize {
        next_grapheme_boundary(text, pos).unwrap_or(text.len())
    }
}
