//! Glyph class metadata from the GDEF table.

/// OpenType glyph class of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphClass {
    Base,
    Mark,
    Ligature,
    Component,
    /// Not classified by the font.
    Unknown,
}

/// Optional per-font capability: classify glyphs.
pub trait GlyphClassSource {
    /// Whether the font carries a glyph class definition at all.
    fn has_glyph_classes(&self) -> bool;

    fn glyph_class(&self, glyph_id: u32) -> GlyphClass;
}

/// Glyph classes read from a font's GDEF table.
#[derive(Clone, Copy)]
pub struct GdefClasses<'a> {
    table: Option<ttf_parser::gdef::Table<'a>>,
}

impl<'a> GdefClasses<'a> {
    pub fn from_face(face: &ttf_parser::Face<'a>) -> Self {
        Self {
            table: face.tables().gdef,
        }
    }

    /// Parse a bare GDEF table.
    pub fn parse(gdef: &'a [u8]) -> Self {
        Self {
            table: ttf_parser::gdef::Table::parse(gdef),
        }
    }
}

impl GlyphClassSource for GdefClasses<'_> {
    fn has_glyph_classes(&self) -> bool {
        self.table.is_some_and(|table| table.has_glyph_classes())
    }

    fn glyph_class(&self, glyph_id: u32) -> GlyphClass {
        let (Some(table), Ok(id)) = (self.table, u16::try_from(glyph_id)) else {
            return GlyphClass::Unknown;
        };
        match table.glyph_class(ttf_parser::GlyphId(id)) {
            Some(ttf_parser::gdef::GlyphClass::Base) => GlyphClass::Base,
            Some(ttf_parser::gdef::GlyphClass::Mark) => GlyphClass::Mark,
            Some(ttf_parser::gdef::GlyphClass::Ligature) => GlyphClass::Ligature,
            Some(ttf_parser::gdef::GlyphClass::Component) => GlyphClass::Component,
            None => GlyphClass::Unknown,
        }
    }
}

impl std::fmt::Debug for GdefClasses<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GdefClasses")
            .field("has_glyph_classes", &self.has_glyph_classes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // GDEF 1.0 header followed by a format 2 ClassDef:
    // glyphs 1..=3 base, glyph 4 mark.
    fn sample_gdef() -> Vec<u8> {
        let mut t = vec![
            0x00, 0x01, 0x00, 0x00, // version 1.0
            0x00, 0x0C, // glyphClassDef offset
            0x00, 0x00, // attachList
            0x00, 0x00, // ligCaretList
            0x00, 0x00, // markAttachClassDef
        ];
        t.extend_from_slice(&[
            0x00, 0x02, // format 2
            0x00, 0x02, // two ranges
            0x00, 0x01, 0x00, 0x03, 0x00, 0x01, // 1..=3 -> base
            0x00, 0x04, 0x00, 0x04, 0x00, 0x03, // 4 -> mark
        ]);
        t
    }

    #[test]
    fn classifies_from_class_def() {
        let data = sample_gdef();
        let classes = GdefClasses::parse(&data);
        assert!(classes.has_glyph_classes());
        assert_eq!(classes.glyph_class(2), GlyphClass::Base);
        assert_eq!(classes.glyph_class(4), GlyphClass::Mark);
        assert_eq!(classes.glyph_class(9), GlyphClass::Unknown);
        assert_eq!(classes.glyph_class(70_000), GlyphClass::Unknown);
    }

    #[test]
    fn missing_table_has_no_classes() {
        let classes = GdefClasses::parse(&[]);
        assert!(!classes.has_glyph_classes());
        assert_eq!(classes.glyph_class(1), GlyphClass::Unknown);
    }
}
