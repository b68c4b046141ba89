use core::ops::Range;
use std::sync::Arc;

use bitflags::bitflags;
use rune_config::ShapingConfig;
use tracing::warn;

use crate::bidi::{BaseDirection, BidiRun, BidiRunSource, LayoutRuns, resolve_base_direction, visual_runs};
use crate::error::{LayoutError, Result};
use crate::layout::cache::TextLayoutCache;
use crate::layout::glyph::Point;

bitflags! {
    /// Direction and pass flags of a layout call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayoutFlags: u32 {
        /// Right-to-left paragraph base direction.
        const BIDI_RTL = 1 << 0;
        /// Skip bidi analysis: the whole range is one run in the base direction.
        const BIDI_STRONG = 1 << 1;
        /// This call re-shapes ranges a previous pass could not render;
        /// glyphs still missing are dropped instead of emitted.
        const FOR_FALLBACK = 1 << 2;
        /// Compress adjacent CJK punctuation when the layout is adjusted
        /// to requested widths.
        const KERNING_ASIAN = 1 << 3;
    }
}

impl LayoutFlags {
    pub fn from_config(config: &ShapingConfig) -> Self {
        let mut flags = LayoutFlags::empty();
        if BaseDirection::from(config.direction) == BaseDirection::Rtl {
            flags |= LayoutFlags::BIDI_RTL;
        }
        if config.bidi_strong {
            flags |= LayoutFlags::BIDI_STRONG;
        }
        if config.kerning_asian {
            flags |= LayoutFlags::KERNING_ASIAN;
        }
        flags
    }
}

/// Caller-owned state of one layout request.
///
/// Holds the full text and the range to lay out, the directional runs to
/// walk, and collects the ranges that need a fallback font. A layout call
/// only consumes runs and appends fallback requests.
#[derive(Debug, Clone)]
pub struct LayoutArgs<'t> {
    text: &'t str,
    range: Range<usize>,
    flags: LayoutFlags,
    language: String,
    layout_cache: Option<Arc<TextLayoutCache>>,
    origin: Point,
    runs: LayoutRuns,
    fallback_runs: LayoutRuns,
    dx_array: Option<Vec<i32>>,
    layout_width: i32,
}

impl<'t> LayoutArgs<'t> {
    /// Lay out `range` of `text`; the base direction comes from
    /// [`LayoutFlags::BIDI_RTL`].
    pub fn new(text: &'t str, range: Range<usize>, flags: LayoutFlags) -> Result<Self> {
        let base = if flags.contains(LayoutFlags::BIDI_RTL) {
            BaseDirection::Rtl
        } else {
            BaseDirection::Ltr
        };
        Self::with_base_direction(text, range, flags, base)
    }

    /// Like [`LayoutArgs::new`] with an explicit base direction, which may be
    /// detected from the text.
    pub fn with_base_direction(
        text: &'t str,
        range: Range<usize>,
        mut flags: LayoutFlags,
        base: BaseDirection,
    ) -> Result<Self> {
        if range.start > range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return Err(LayoutError::InvalidRange {
                start: range.start,
                end: range.end,
                len: text.len(),
            });
        }

        if resolve_base_direction(text, range.start, base) == BaseDirection::Rtl {
            flags |= LayoutFlags::BIDI_RTL;
        } else {
            flags -= LayoutFlags::BIDI_RTL;
        }

        let runs = if range.is_empty() {
            LayoutRuns::new()
        } else if flags.contains(LayoutFlags::BIDI_STRONG) {
            LayoutRuns::from_runs(vec![BidiRun::new(range.clone(), flags.contains(LayoutFlags::BIDI_RTL))])
        } else {
            LayoutRuns::from_runs(visual_runs(text, base, range.clone()))
        };

        Ok(Self {
            text,
            range,
            flags,
            language: "en".to_string(),
            layout_cache: None,
            origin: Point::default(),
            runs,
            fallback_runs: LayoutRuns::new(),
            dx_array: None,
            layout_width: 0,
        })
    }

    /// Build arguments from the shaping section of the configuration.
    pub fn from_config(text: &'t str, range: Range<usize>, config: &ShapingConfig) -> Result<Self> {
        let flags = LayoutFlags::from_config(config);
        let args = Self::with_base_direction(text, range, flags, config.direction.into())?;
        Ok(args.with_language(config.language.clone()))
    }

    /// BCP 47 language of the text.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Reuse script runs computed earlier for the same text.
    pub fn with_layout_cache(mut self, cache: Arc<TextLayoutCache>) -> Self {
        self.layout_cache = Some(cache);
        self
    }

    /// Pen position the first glyph is placed at.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Requested end position of every character of the range, relative to
    /// the origin and in logical order; the layout is stretched or squeezed
    /// to match when it is adjusted.
    pub fn with_dx_array(mut self, dx_array: Vec<i32>) -> Result<Self> {
        let expected = self.text[self.range.clone()].chars().count();
        if dx_array.len() != expected {
            return Err(LayoutError::InvalidDxArray {
                expected,
                actual: dx_array.len(),
            });
        }
        self.dx_array = Some(dx_array);
        Ok(self)
    }

    /// Width the whole layout is justified to; 0 leaves it alone. Ignored
    /// when a DX array is set.
    pub fn with_layout_width(mut self, width: i32) -> Self {
        self.layout_width = width;
        self
    }

    pub fn dx_array(&self) -> Option<&[i32]> {
        self.dx_array.as_deref()
    }

    pub fn layout_width(&self) -> i32 {
        self.layout_width
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn flags(&self) -> LayoutFlags {
        self.flags
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn layout_cache(&self) -> Option<&Arc<TextLayoutCache>> {
        self.layout_cache.as_ref()
    }

    /// Directional runs of this call in visual order, including consumed ones.
    pub fn runs(&self) -> &[BidiRun] {
        self.runs.runs()
    }

    /// Rewind the run cursor so the same runs can be laid out again.
    pub fn reset_runs(&mut self) {
        self.runs.reset();
    }

    /// The supplied cache when it was built from this text, otherwise a
    /// freshly built one, which is also kept for later passes.
    pub(crate) fn resolve_layout_cache(&mut self) -> Arc<TextLayoutCache> {
        if let Some(cache) = &self.layout_cache {
            if cache.matches(self.text) {
                return cache.clone();
            }
            warn!(len = self.text.len(), "supplied layout cache was built for different text; rebuilding");
        }
        let cache = Arc::new(TextLayoutCache::build(self.text));
        self.layout_cache = Some(cache.clone());
        cache
    }

    /// Record that `range` must be drawn with another font.
    pub fn need_fallback(&mut self, range: Range<usize>, rtl: bool) {
        self.fallback_runs.merge_run(range, rtl);
    }

    /// Fallback requests collected so far.
    pub fn fallback_runs(&self) -> &[BidiRun] {
        self.fallback_runs.runs()
    }

    pub fn has_fallback_requests(&self) -> bool {
        !self.fallback_runs.is_empty()
    }

    /// Turn the collected fallback requests into the runs of a fallback pass.
    ///
    /// Requested characters are regrouped along the current runs, in the
    /// same visual order and direction, and the pass is marked
    /// [`LayoutFlags::FOR_FALLBACK`]. Returns `false`, leaving no runs to
    /// lay out, when nothing was requested.
    pub fn prepare_fallback(&mut self) -> bool {
        if self.fallback_runs.is_empty() {
            self.runs.clear();
            return false;
        }

        let text = self.text;
        let mut positions: Vec<Range<usize>> = self
            .fallback_runs
            .take()
            .into_iter()
            .flat_map(|run| {
                let start = run.range.start;
                text[run.range]
                    .char_indices()
                    .map(move |(i, ch)| start + i..start + i + ch.len_utf8())
            })
            .collect();
        positions.sort_by_key(|pos| pos.start);
        positions.dedup_by_key(|pos| pos.start);

        let mut runs = LayoutRuns::new();
        for run in self.runs.runs() {
            let first = positions.partition_point(|pos| pos.start < run.range.start);
            let last = positions.partition_point(|pos| pos.start < run.range.end);
            let inside = &positions[first..last];
            if run.rtl {
                for pos in inside.iter().rev() {
                    runs.add_pos(pos.clone(), true);
                }
            } else {
                for pos in inside {
                    runs.add_pos(pos.clone(), false);
                }
            }
        }

        self.runs = runs;
        self.flags |= LayoutFlags::FOR_FALLBACK;
        true
    }
}

impl BidiRunSource for LayoutArgs<'_> {
    fn next_run(&mut self) -> Option<BidiRun> {
        self.runs.next_run()
    }
}
