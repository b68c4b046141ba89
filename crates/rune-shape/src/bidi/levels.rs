use core::ops::Range;

use rune_config::DirectionConfig;
use unicode_bidi::{BidiInfo, LTR_LEVEL, Level, RTL_LEVEL};

/// Base direction hint for paragraph analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseDirection {
    /// Detect paragraph base direction from text (first strong char).
    Auto,
    /// Force overall left-to-right base direction.
    #[default]
    Ltr,
    /// Force overall right-to-left base direction.
    Rtl,
}

impl BaseDirection {
    pub fn to_level(self) -> Option<Level> {
        match self {
            BaseDirection::Auto => None,
            BaseDirection::Ltr => Some(LTR_LEVEL),
            BaseDirection::Rtl => Some(RTL_LEVEL),
        }
    }
}

impl From<DirectionConfig> for BaseDirection {
    fn from(config: DirectionConfig) -> Self {
        match config {
            DirectionConfig::Auto => BaseDirection::Auto,
            DirectionConfig::Ltr => BaseDirection::Ltr,
            DirectionConfig::Rtl => BaseDirection::Rtl,
        }
    }
}

/// BiDi information for a single paragraph.
#[derive(Debug, Clone)]
pub struct ParagraphBidi {
    /// Byte range of this paragraph within the text.
    pub range: Range<usize>,
    /// Paragraph embedding level (UAX-9).
    pub level: u8,
}

impl ParagraphBidi {
    pub fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }
}

/// Compute paragraph-level BiDi information for the given text.
///
/// With [`BaseDirection::Auto`] each paragraph takes the direction of its
/// first strong character (UAX-9 rules P2 and P3).
pub fn paragraph_bidi_info(text: &str, base_dir: BaseDirection) -> Vec<ParagraphBidi> {
    let info = BidiInfo::new(text, base_dir.to_level());
    info.paragraphs
        .iter()
        .map(|para| ParagraphBidi {
            range: para.range.clone(),
            level: para.level.number(),
        })
        .collect()
}

/// Resolve the base direction of the paragraph containing `offset`.
///
/// Explicit directions are returned as is; `Auto` becomes `Ltr` or `Rtl`.
pub fn resolve_base_direction(text: &str, offset: usize, base_dir: BaseDirection) -> BaseDirection {
    if base_dir != BaseDirection::Auto {
        return base_dir;
    }
    let paras = paragraph_bidi_info(text, base_dir);
    let rtl = paras
        .iter()
        .find(|para| para.range.contains(&offset))
        .or_else(|| paras.last())
        .is_some_and(ParagraphBidi::is_rtl);
    if rtl { BaseDirection::Rtl } else { BaseDirection::Ltr }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_paragraph_direction_auto() {
        let paras = paragraph_bidi_info("אבג", BaseDirection::Auto);
        assert_eq!(paras.len(), 1);
        assert!(paras[0].is_rtl());
        assert_eq!(paras[0].level, 1);
    }

    #[test]
    fn base_direction_override() {
        assert!(paragraph_bidi_info("abc", BaseDirection::Rtl)[0].is_rtl());
        assert!(!paragraph_bidi_info("אבג", BaseDirection::Ltr)[0].is_rtl());
    }

    #[test]
    fn first_strong_character_decides() {
        assert!(!paragraph_bidi_info("123 abc אבג", BaseDirection::Auto)[0].is_rtl());
        assert!(paragraph_bidi_info("123 אבג abc", BaseDirection::Auto)[0].is_rtl());
    }

    #[test]
    fn newline_splits_paragraphs() {
        let paras = paragraph_bidi_info("abc\nאבג", BaseDirection::Auto);
        assert_eq!(paras.len(), 2);
        assert!(!paras[0].is_rtl());
        assert!(paras[1].is_rtl());
    }

    #[test]
    fn resolves_auto_per_paragraph() {
        let text = "abc\nאבג";
        assert_eq!(resolve_base_direction(text, 0, BaseDirection::Auto), BaseDirection::Ltr);
        assert_eq!(resolve_base_direction(text, 4, BaseDirection::Auto), BaseDirection::Rtl);
        assert_eq!(resolve_base_direction(text, text.len(), BaseDirection::Auto), BaseDirection::Rtl);
        assert_eq!(resolve_base_direction(text, 4, BaseDirection::Ltr), BaseDirection::Ltr);
    }

    #[test]
    fn config_maps_to_base_direction() {
        assert_eq!(BaseDirection::from(DirectionConfig::Rtl), BaseDirection::Rtl);
        assert_eq!(BaseDirection::from(DirectionConfig::Auto).to_level(), None);
    }
}
