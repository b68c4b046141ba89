use std::str::FromStr;

use harfrust::{
    BufferClusterLevel,
    BufferFlags,
    Direction as HbDirection,
    FontRef as HbFontRef,
    Language as HbLanguage,
    Script as HbScript,
    ShaperData,
    ShaperInstance,
    Tag as HbTag,
    UnicodeBuffer as HbUnicodeBuffer,
};
use tracing::trace;
use unicode_script::Script;

use crate::error::{LayoutError, Result};
use crate::font::metrics::to_fixed;
use crate::font::{FaceData, FontError, FontSelection, GdefClasses, GlyphClassSource};
use crate::script::iso15924_tag;

use super::{Direction, ShapeRequest, ShapedGlyph, ShapingEngine, shaping_language};

/// Shaping engine built on harfrust (pure-Rust HarfBuzz port).
///
/// Borrows the face bytes for the duration of one layout call. Pixel size
/// is fixed at construction; harfrust reports design units, which are
/// scaled here to 26.6 fixed point at that size.
pub struct HarfrustEngine<'a> {
    font: HbFontRef<'a>,
    data: ShaperData,
    instance: ShaperInstance,
    classes: GdefClasses<'a>,
    units_per_em: u16,
    selection: FontSelection,
}

impl<'a> HarfrustEngine<'a> {
    pub fn new(face: &'a FaceData<'_>, selection: FontSelection) -> Result<Self> {
        let bytes: &'a [u8] = &face.data;
        let parsed = ttf_parser::Face::parse(bytes, face.index).map_err(|_| FontError::InvalidFont)?;
        let units_per_em = parsed.units_per_em();
        if units_per_em == 0 {
            return Err(LayoutError::Engine("font reports zero units per em".to_string()));
        }
        let classes = GdefClasses::from_face(&parsed);

        let font = HbFontRef::from_index(bytes, face.index)
            .map_err(|err| LayoutError::Engine(format!("harfrust rejected face: {err}")))?;

        // Shaper configuration with default (no variations) instance.
        let data = ShaperData::new(&font);
        let instance = ShaperInstance::from_variations(&font, core::iter::empty::<harfrust::Variation>());

        Ok(Self {
            font,
            data,
            instance,
            classes,
            units_per_em,
            selection,
        })
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }
}

fn is_weak(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

impl ShapingEngine for HarfrustEngine<'_> {
    fn shape(&mut self, text: &str, request: &ShapeRequest<'_>) -> Vec<ShapedGlyph> {
        let shaper = self
            .data
            .shaper(&self.font)
            .instance(Some(&self.instance))
            .point_size(None)
            .build();

        // Clusters are absolute byte offsets so glyphs map straight back
        // into the full text.
        let mut buffer = HbUnicodeBuffer::new();
        let slice = &text[request.range.clone()];
        for (offset, ch) in slice.char_indices() {
            buffer.add(ch, (request.range.start + offset) as u32);
        }
        // Surrounding text steers contextual forms at the subrun edges.
        buffer.set_pre_context(&text[..request.range.start]);
        buffer.set_post_context(&text[request.range.end..]);

        buffer.set_direction(match request.direction {
            Direction::LeftToRight => HbDirection::LeftToRight,
            Direction::RightToLeft => HbDirection::RightToLeft,
        });
        if !is_weak(request.script) {
            if let Some(script) = HbScript::from_iso15924_tag(HbTag::new(&iso15924_tag(request.script))) {
                buffer.set_script(script);
            }
        }
        if let Ok(language) = HbLanguage::from_str(&shaping_language(request.language)) {
            buffer.set_language(language);
        }
        // Fill in whatever the run could not pin down (script of an all-common run).
        buffer.guess_segment_properties();

        let mut flags = BufferFlags::empty();
        if request.start_of_text {
            flags |= BufferFlags::BEGINNING_OF_TEXT;
        }
        if request.end_of_text {
            flags |= BufferFlags::END_OF_TEXT;
        }
        buffer.set_flags(flags);
        buffer.set_cluster_level(BufferClusterLevel::MonotoneCharacters);

        let glyph_buffer = shaper.shape(buffer, &[]);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();

        let (sx, sy, upem) = (self.selection.scale_x(), self.selection.scale_y(), self.units_per_em);
        let glyphs: Vec<ShapedGlyph> = infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                x_advance: to_fixed(pos.x_advance, sx, upem),
                y_advance: to_fixed(pos.y_advance, sy, upem),
                x_offset: to_fixed(pos.x_offset, sx, upem),
                y_offset: to_fixed(pos.y_offset, sy, upem),
            })
            .collect();

        trace!(
            range = ?request.range,
            script = ?request.script,
            rtl = request.direction.is_rtl(),
            glyphs = glyphs.len(),
            "shaped subrun"
        );
        glyphs
    }

    fn glyph_classes(&self) -> Option<&dyn GlyphClassSource> {
        Some(&self.classes)
    }
}
