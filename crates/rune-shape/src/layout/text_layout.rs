use std::sync::Arc;

use tracing::{debug, trace};

use crate::bidi::BidiRunSource;
use crate::error::Result;
use crate::font::metrics::from_fixed;
use crate::font::{FontHandle, FontMetrics, FontSelection};
use crate::layout::args::{LayoutArgs, LayoutFlags};
use crate::layout::cache::TextLayoutCache;
use crate::layout::classify::{ClusterTracker, char_at, is_diacritic};
use crate::layout::glyph::{GlyphFlags, GlyphItem, GlyphLayout, Point};
use crate::shaping::{Direction, HarfrustEngine, ShapeRequest, ShapingEngine, script_subruns};
use crate::unicode::{BoundaryAnalyzer, GraphemeBoundaries};

/// Lays out text with one font at one size.
///
/// Every call shapes with a fresh engine over the font's bytes; nothing
/// survives between calls except what the caller keeps in [`LayoutArgs`]
/// and the returned layout cache.
pub struct TextShaper<'f> {
    font: &'f dyn FontHandle,
    selection: FontSelection,
}

impl<'f> TextShaper<'f> {
    pub fn new(font: &'f dyn FontHandle, selection: FontSelection) -> Self {
        Self { font, selection }
    }

    pub fn font(&self) -> &'f dyn FontHandle {
        self.font
    }

    pub fn selection(&self) -> FontSelection {
        self.selection
    }

    /// Script runs of `text`, reusable across calls on the same text.
    pub fn create_layout_cache(&self, text: &str) -> Arc<TextLayoutCache> {
        Arc::new(TextLayoutCache::build(text))
    }

    /// Shape the runs of `args` into positioned glyphs sorted by character,
    /// then fit them to the DX array or layout width `args` carries.
    ///
    /// Missing glyphs are reported through [`LayoutArgs::need_fallback`].
    /// Fails only when the font cannot be turned into a shaping face.
    pub fn layout_text(&self, args: &mut LayoutArgs<'_>) -> Result<GlyphLayout> {
        let face = self.font.face_data()?;
        let mut engine = HarfrustEngine::new(&face, self.selection)?;
        let metrics = FontMetrics::read(&face.data, face.index)?.scale_to_pixels(self.selection.ppem_y() as f32);
        debug!(
            font = self.font.name(),
            ppem_x = self.selection.ppem_x(),
            ppem_y = self.selection.ppem_y(),
            upem = engine.units_per_em(),
            "layout_text"
        );
        let mut layout = layout_glyphs(&mut engine, &GraphemeBoundaries, args).with_line_metrics(metrics);
        layout.sort_glyph_items();
        layout.adjust_layout(args);
        Ok(layout)
    }
}

/// Walk the runs of `args`, shape each script subrun with `engine`, and
/// position the glyphs along one pen.
///
/// Glyphs come back in emission order, which is visual order; callers
/// that want logical order use [`GlyphLayout::sort_glyph_items`].
pub fn layout_glyphs(
    engine: &mut dyn ShapingEngine,
    boundaries: &dyn BoundaryAnalyzer,
    args: &mut LayoutArgs<'_>,
) -> GlyphLayout {
    let text = args.text();
    let cache = args.resolve_layout_cache();
    let for_fallback = args.flags().contains(LayoutFlags::FOR_FALLBACK);
    let language = args.language().to_owned();
    let origin = args.origin();

    let mut pen = origin;
    let mut glyphs = Vec::with_capacity(2 * args.range().len());

    debug!(
        range = ?args.range(),
        runs = args.runs().len(),
        for_fallback,
        language = %language,
        "laying out"
    );

    while let Some(run) = args.next_run() {
        let direction = Direction::from_rtl(run.rtl);
        for subrun in script_subruns(cache.runs(), run.range.clone(), run.rtl) {
            let request = ShapeRequest {
                range: subrun.range(),
                direction,
                script: subrun.script,
                language: &language,
                start_of_text: subrun.start == 0,
                end_of_text: subrun.end == text.len(),
            };
            let shaped = engine.shape(text, &request);

            let mut tracker = ClusterTracker::new(run.rtl);
            for glyph in &shaped {
                let pos = glyph.cluster as usize;

                if glyph.glyph_id == 0 {
                    let fallback = boundaries.grapheme_at(text, pos);
                    trace!(pos, range = ?fallback, "missing glyph");
                    args.need_fallback(fallback, run.rtl);
                    // This font already failed once for these characters.
                    if for_fallback {
                        continue;
                    }
                }

                let mut flags = GlyphFlags::empty();
                if run.rtl {
                    flags |= GlyphFlags::RTL;
                }
                if tracker.in_cluster(text, pos, boundaries) {
                    flags |= GlyphFlags::IN_CLUSTER;
                }
                if is_diacritic(engine.glyph_classes(), engine.has_unicode_categories(), glyph, char_at(text, pos)) {
                    flags |= GlyphFlags::DIACRITIC;
                }

                let x_advance = from_fixed(glyph.x_advance);
                let y_advance = from_fixed(glyph.y_advance);
                let x_offset = from_fixed(glyph.x_offset);
                let y_offset = from_fixed(glyph.y_offset);

                glyphs.push(GlyphItem {
                    char_index: pos,
                    glyph_id: glyph.glyph_id,
                    position: Point::new(pen.x + x_offset, -(pen.y + y_offset)),
                    flags,
                    x_advance,
                    x_offset,
                });

                pen.x += x_advance;
                pen.y += y_advance;
            }
        }
    }

    debug!(glyphs = glyphs.len(), width = pen.x - origin.x, "layout done");
    GlyphLayout::new(glyphs, args.range(), origin, pen, cache)
}
