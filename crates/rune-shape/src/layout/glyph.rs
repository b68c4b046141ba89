use core::ops::Range;
use std::sync::Arc;

use bitflags::bitflags;
use tracing::trace;

use crate::font::ScaledFontMetrics;
use crate::layout::args::{LayoutArgs, LayoutFlags};
use crate::layout::cache::TextLayoutCache;
use crate::layout::classify::char_at;

/// Integer pixel position; y grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct GlyphFlags: u8 {
        /// Shaped as part of a right-to-left run.
        const RTL = 1 << 0;
        /// Not the first glyph of its grapheme cluster.
        const IN_CLUSTER = 1 << 1;
        /// Combining mark drawn over the preceding glyph.
        const DIACRITIC = 1 << 2;
    }
}

/// One positioned glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphItem {
    /// Byte offset in the full text of the character this glyph renders.
    pub char_index: usize,
    /// Glyph id in the font; 0 is the missing glyph.
    pub glyph_id: u32,
    pub position: Point,
    pub flags: GlyphFlags,
    pub x_advance: i32,
    pub x_offset: i32,
}

impl GlyphItem {
    pub fn is_rtl(&self) -> bool {
        self.flags.contains(GlyphFlags::RTL)
    }

    pub fn is_in_cluster(&self) -> bool {
        self.flags.contains(GlyphFlags::IN_CLUSTER)
    }

    pub fn is_diacritic(&self) -> bool {
        self.flags.contains(GlyphFlags::DIACRITIC)
    }

    pub fn is_missing(&self) -> bool {
        self.glyph_id == 0
    }
}

/// Result of one layout call.
///
/// Glyphs are sorted by `char_index` once layout finishes; positions keep
/// the visual placement computed while shaping, and `visual_order` keeps
/// the emission order so widths can still be adjusted left to right.
#[derive(Debug, Clone)]
pub struct GlyphLayout {
    glyphs: Vec<GlyphItem>,
    /// Indices into `glyphs`, leftmost glyph first.
    visual_order: Vec<usize>,
    range: Range<usize>,
    origin: Point,
    pen: Point,
    layout_cache: Arc<TextLayoutCache>,
    line_metrics: Option<ScaledFontMetrics>,
}

impl GlyphLayout {
    pub(crate) fn new(
        glyphs: Vec<GlyphItem>,
        range: Range<usize>,
        origin: Point,
        pen: Point,
        layout_cache: Arc<TextLayoutCache>,
    ) -> Self {
        Self {
            visual_order: (0..glyphs.len()).collect(),
            glyphs,
            range,
            origin,
            pen,
            layout_cache,
            line_metrics: None,
        }
    }

    pub(crate) fn with_line_metrics(mut self, metrics: ScaledFontMetrics) -> Self {
        self.line_metrics = Some(metrics);
        self
    }

    pub fn glyphs(&self) -> &[GlyphItem] {
        &self.glyphs
    }

    pub fn into_glyphs(self) -> Vec<GlyphItem> {
        self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The range of the text this layout covers.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Pen position after the last emitted glyph.
    pub fn pen(&self) -> Point {
        self.pen
    }

    /// Horizontal distance the pen travelled.
    pub fn width(&self) -> i32 {
        self.pen.x - self.origin.x
    }

    /// Script runs used for this layout; hand them to later calls on the
    /// same text.
    pub fn layout_cache(&self) -> &Arc<TextLayoutCache> {
        &self.layout_cache
    }

    /// Ascent, descent and line gap of the font at the laid out size.
    ///
    /// `None` for layouts built straight from a shaping engine.
    pub fn line_metrics(&self) -> Option<ScaledFontMetrics> {
        self.line_metrics
    }

    /// Glyphs from left to right, whatever order `glyphs()` is in.
    pub fn visual_glyphs(&self) -> impl Iterator<Item = &GlyphItem> + '_ {
        self.visual_order.iter().map(|&i| &self.glyphs[i])
    }

    /// Stable sort by character index, so glyphs of one character keep
    /// their emission order.
    pub fn sort_glyph_items(&mut self) {
        let mut order: Vec<usize> = (0..self.glyphs.len()).collect();
        order.sort_by_key(|&i| self.glyphs[i].char_index);

        let mut rank = vec![0; order.len()];
        for (sorted, &old) in order.iter().enumerate() {
            rank[old] = sorted;
        }
        for slot in &mut self.visual_order {
            *slot = rank[*slot];
        }
        self.glyphs = order.iter().map(|&old| self.glyphs[old]).collect();
    }

    /// Fit the layout to the widths requested in `args`.
    ///
    /// A DX array wins over a layout width; with neither the layout is left
    /// alone. Asian punctuation is compressed first when
    /// [`LayoutFlags::KERNING_ASIAN`] is set, so the requested widths still
    /// hold afterwards.
    pub fn adjust_layout(&mut self, args: &LayoutArgs<'_>) {
        let dx_array = args.dx_array();
        let width = args.layout_width();
        if dx_array.is_none() && width <= 0 {
            return;
        }
        if args.flags().contains(LayoutFlags::KERNING_ASIAN) {
            self.apply_asian_kerning(args.text());
        }
        match dx_array {
            Some(dx_array) => self.apply_dx_array(args.text(), dx_array),
            None => self.justify(width),
        }
    }

    /// Give every character the width implied by `dx_array`, whose entries
    /// are the end offsets of the characters of the range measured from the
    /// origin, in logical order.
    ///
    /// Characters without glyphs of their own (the tail of a ligature) pass
    /// their width on to the closest preceding character that has glyphs.
    /// In right-to-left runs the extra space goes to the left of a glyph.
    pub fn apply_dx_array(&mut self, text: &str, dx_array: &[i32]) {
        let Some(slice) = text.get(self.range.clone()) else {
            return;
        };
        let starts: Vec<usize> = slice.char_indices().map(|(i, _)| self.range.start + i).collect();
        if starts.len() != dx_array.len() || self.glyphs.is_empty() {
            return;
        }

        let old_widths = self.char_widths(text);
        let mut has_glyphs = vec![false; starts.len()];
        for glyph in &self.glyphs {
            if let Ok(slot) = starts.binary_search(&glyph.char_index) {
                has_glyphs[slot] = true;
            }
        }

        let mut new_widths: Vec<i32> = dx_array
            .iter()
            .scan(0, |prev, &end| {
                let width = end - *prev;
                *prev = end;
                Some(width)
            })
            .collect();
        let mut owner = None;
        let mut orphaned = 0;
        for slot in 0..new_widths.len() {
            if has_glyphs[slot] {
                new_widths[slot] += orphaned;
                orphaned = 0;
                owner = Some(slot);
            } else {
                match owner {
                    Some(owner) => new_widths[owner] += new_widths[slot],
                    None => orphaned += new_widths[slot],
                }
                new_widths[slot] = 0;
            }
        }

        let mut applied = vec![false; starts.len()];
        let mut delta = 0;
        let mut v = 0;
        while v < self.visual_order.len() {
            let char_index = self.glyphs[self.visual_order[v]].char_index;
            let mut end = v + 1;
            while end < self.visual_order.len() && self.glyphs[self.visual_order[end]].char_index == char_index {
                end += 1;
            }

            let diff = match starts.binary_search(&char_index) {
                Ok(slot) if !applied[slot] => {
                    applied[slot] = true;
                    new_widths[slot] - old_widths[slot]
                }
                _ => 0,
            };
            for (n, &i) in self.visual_order[v..end].iter().enumerate() {
                let glyph = &mut self.glyphs[i];
                glyph.position.x += if glyph.is_rtl() { delta + diff } else { delta };
                if n == 0 {
                    glyph.x_advance += diff;
                }
            }
            delta += diff;
            v = end;
        }

        trace!(delta, "applied dx array");
        self.pen.x += delta;
    }

    /// Stretch or squeeze the layout to `new_width` pixels.
    ///
    /// The rightmost glyph is pinned to the new right edge. Growing spreads
    /// the extra space evenly over the other non-diacritic glyphs;
    /// shrinking scales their positions towards the origin. A layout is
    /// never squeezed below its widest glyph.
    pub fn justify(&mut self, new_width: i32) {
        let old_width = self.width();
        let Some((&right, rest)) = self.visual_order.split_last() else {
            return;
        };
        if old_width == 0 || old_width == new_width {
            return;
        }

        let right_advance = self.glyphs[right].x_advance;
        let widest = rest.iter().map(|&i| self.glyphs[i].x_advance).max().unwrap_or(0);
        let old = old_width - right_advance;
        if old <= 0 {
            return;
        }
        let new = new_width.max(widest) - right_advance;
        let x0 = self.origin.x;
        self.glyphs[right].position.x = x0 + new;

        let diff = new - old;
        if diff >= 0 {
            let mut stretchable = rest.iter().filter(|&&i| !self.glyphs[i].is_diacritic()).count() as i32;
            let mut remaining = diff;
            let mut shift = 0;
            for &i in rest {
                let glyph = &mut self.glyphs[i];
                glyph.position.x += shift;
                if stretchable > 0 && !glyph.is_diacritic() {
                    let d = remaining / stretchable;
                    glyph.x_advance += d;
                    remaining -= d;
                    stretchable -= 1;
                    shift += d;
                }
            }
        } else {
            for &i in rest.iter().skip(1) {
                let glyph = &mut self.glyphs[i];
                let scaled = (glyph.position.x - x0) as i64 * new as i64 / old as i64;
                glyph.position.x = x0 + scaled as i32;
            }
            for (v, &i) in rest.iter().enumerate() {
                let next_x = self.glyphs[self.visual_order[v + 1]].position.x;
                let glyph = &mut self.glyphs[i];
                glyph.x_advance = next_x - glyph.position.x;
            }
        }

        trace!(old_width, new_width = new + right_advance, "justified");
        self.pen.x = x0 + new + right_advance;
    }

    /// Compress the advance of CJK punctuation that sits next to other
    /// punctuation, following the JIS X 4051 spacing classes.
    pub fn apply_asian_kerning(&mut self, text: &str) {
        let end = self.range.end;
        let mut offset = 0;
        let mut previous = None;
        for &i in &self.visual_order {
            let glyph = &mut self.glyphs[i];
            glyph.position.x += offset;

            let first_of_char = previous != Some(glyph.char_index);
            previous = Some(glyph.char_index);
            if !first_of_char || glyph.is_in_cluster() {
                continue;
            }
            let Some(here) = char_at(text, glyph.char_index).filter(|&c| is_compressible(c)) else {
                continue;
            };
            let next_pos = glyph.char_index + here.len_utf8();
            let Some(next) = text.get(next_pos..end).and_then(|rest| rest.chars().next()) else {
                continue;
            };

            let kern_first = asian_kerning(here, true);
            let kern_next = -asian_kerning(next, false);
            let delta = kern_first.min(kern_next);
            if delta < 0 && kern_first != 0 && kern_next != 0 {
                let d = (delta * glyph.x_advance + 2) / 4;
                glyph.x_advance += d;
                offset += d;
            }
        }
        self.pen.x += offset;
    }

    pub fn glyphs_for_char(&self, char_index: usize) -> impl Iterator<Item = &GlyphItem> + '_ {
        self.glyphs.iter().filter(move |glyph| glyph.char_index == char_index)
    }

    /// Whether any missing glyph made it into the output.
    pub fn has_fallback_glyphs(&self) -> bool {
        self.glyphs.iter().any(GlyphItem::is_missing)
    }

    /// Advance width of every character of the laid out range, in logical
    /// order. A character's width is the sum of its glyphs' advances, so
    /// the first character of a ligature carries the whole ligature.
    pub fn char_widths(&self, text: &str) -> Vec<i32> {
        let Some(slice) = text.get(self.range.clone()) else {
            return Vec::new();
        };
        let starts: Vec<usize> = slice.char_indices().map(|(i, _)| self.range.start + i).collect();
        let mut widths = vec![0; starts.len()];
        for glyph in &self.glyphs {
            if let Ok(slot) = starts.binary_search(&glyph.char_index) {
                widths[slot] += glyph.x_advance;
            }
        }
        widths
    }
}

/// Fullwidth forms, CJK symbols and punctuation, and the general
/// punctuation dashes and quotes.
fn is_compressible(c: char) -> bool {
    let c = c as u32;
    (c & 0xFF00) == 0x3000 || (c & 0xFFF0) == 0x2010 || (c & 0xFF00) == 0xFF00
}

/// Spacing class of `c` in quarter ems: negative for punctuation with
/// blank space on its right, positive for space on its left.
fn asian_kerning(c: char, left: bool) -> i32 {
    const CJK_PUNCTUATION: [i8; 0x30] = [
        0, -2, -2, 0, 0, 0, 0, 0, 2, -2, 2, -2, 2, -2, 2, -2, //
        2, -2, 0, 0, 2, -2, 2, -2, 0, 0, 0, 0, 0, 2, -2, -2, //
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, -2, -2, 2, 2, -2, -2,
    ];
    match c as u32 {
        c @ 0x3000..=0x302F => CJK_PUNCTUATION[(c - 0x3000) as usize] as i32,
        0x30FB => {
            if left {
                -1
            } else {
                1
            }
        }
        0x2019 | 0x201D | 0xFF01 | 0xFF09 | 0xFF0C | 0xFF1A | 0xFF1B => -2,
        0x2018 | 0x201C | 0xFF08 => 2,
        _ => 0,
    }
}
