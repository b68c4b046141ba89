//! End-to-end layout through harfrust with an installed font.
//!
//! Tests that need a real font return early when the machine has none.

use anyhow::Result;
use rune_shape::bidi::BaseDirection;
use rune_shape::font::load_system_default_font;
use rune_shape::{FontError, FontFace, FontSelection, LayoutArgs, LayoutError, LayoutFlags, TableFace, TextShaper};

fn system_font() -> Option<FontFace> {
    match load_system_default_font() {
        Ok(face) => Some(face),
        Err(err) => {
            eprintln!("skipping: {err}");
            None
        }
    }
}

#[test]
fn shapes_latin_with_system_font() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let shaper = TextShaper::new(&font, FontSelection::new(16));
    let text = "Hello";
    let mut args = LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?;
    let layout = shaper.layout_text(&mut args)?;

    assert!(!layout.is_empty());
    assert!(layout.glyphs().iter().all(|g| !g.is_rtl()));
    assert!(layout.glyphs().windows(2).all(|w| w[0].position.x <= w[1].position.x));
    assert!(layout.width() > 0);
    if !args.has_fallback_requests() {
        assert_eq!(layout.len(), 5);
    }
    Ok(())
}

#[test]
fn larger_size_gives_wider_layout() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let text = "Hello world";
    let small = TextShaper::new(&font, FontSelection::new(12))
        .layout_text(&mut LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?)?;
    let large = TextShaper::new(&font, FontSelection::new(48))
        .layout_text(&mut LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?)?;
    assert!(large.width() > small.width());
    Ok(())
}

#[test]
fn unassigned_code_point_needs_fallback() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let shaper = TextShaper::new(&font, FontSelection::new(16));
    let text = "a\u{10FFFD}b";
    let mut args = LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?;
    let layout = shaper.layout_text(&mut args)?;

    assert!(layout.has_fallback_glyphs());
    assert_eq!(args.fallback_runs().len(), 1);
    assert_eq!(args.fallback_runs()[0].range, 1..5);

    assert!(args.prepare_fallback());
    let second = shaper.layout_text(&mut args)?;
    assert!(second.is_empty());
    Ok(())
}

#[test]
fn table_backend_matches_file_backend() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let tables = TableFace::from_tables(&font, "tables");
    let text = "Typography";

    let from_file = TextShaper::new(&font, FontSelection::new(20))
        .layout_text(&mut LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?)?;
    let from_tables = TextShaper::new(&tables, FontSelection::new(20))
        .layout_text(&mut LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?)?;

    assert_eq!(from_file.glyphs(), from_tables.glyphs());
    Ok(())
}

#[test]
fn face_without_tables_fails_to_build_an_engine() -> Result<()> {
    let font = TableFace::new("x");
    let text = "abc";
    let mut args = LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?;
    let result = TextShaper::new(&font, FontSelection::new(16)).layout_text(&mut args);
    assert!(matches!(result, Err(LayoutError::Font(FontError::MissingTable(_)))));
    Ok(())
}

#[test]
fn rtl_text_is_laid_out_right_to_left() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let shaper = TextShaper::new(&font, FontSelection::new(16));
    let text = "שלום";
    let mut args = LayoutArgs::with_base_direction(text, 0..text.len(), LayoutFlags::empty(), BaseDirection::Auto)?;
    assert!(args.flags().contains(LayoutFlags::BIDI_RTL));
    let layout = shaper.layout_text(&mut args)?;
    if args.has_fallback_requests() {
        return Ok(());
    }

    assert!(layout.glyphs().iter().all(|g| g.is_rtl()));
    assert!(layout.glyphs().windows(2).all(|w| w[0].char_index <= w[1].char_index));
    // the first character ends up on the right
    let visual: Vec<usize> = layout.visual_glyphs().map(|g| g.char_index).collect();
    assert!(visual.windows(2).all(|w| w[0] >= w[1]));
    assert!(layout.width() > 0);
    Ok(())
}

#[test]
fn sub_range_keeps_contextual_forms() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let shaper = TextShaper::new(&font, FontSelection::new(16));
    // beh, yeh, teh: the yeh takes its medial form
    let text = "\u{0628}\u{064A}\u{062A}";

    let mut full_args = LayoutArgs::new(text, 0..text.len(), LayoutFlags::BIDI_RTL)?;
    let full = shaper.layout_text(&mut full_args)?;
    if full_args.has_fallback_requests() {
        return Ok(());
    }
    let mut part_args = LayoutArgs::new(text, 2..4, LayoutFlags::BIDI_RTL)?;
    let part = shaper.layout_text(&mut part_args)?;

    let ids = |layout: &rune_shape::GlyphLayout| -> Vec<u32> { layout.glyphs_for_char(2).map(|g| g.glyph_id).collect() };
    assert!(!ids(&part).is_empty());
    assert_eq!(ids(&part), ids(&full));
    Ok(())
}

#[test]
fn sub_range_shapes_only_its_characters() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let shaper = TextShaper::new(&font, FontSelection::new(16));
    let text = "Hello";
    let full = shaper.layout_text(&mut LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?)?;
    let part = shaper.layout_text(&mut LayoutArgs::new(text, 1..4, LayoutFlags::empty())?)?;

    assert!(part.glyphs().iter().all(|g| (1..4).contains(&g.char_index)));
    let ids_in = |layout: &rune_shape::GlyphLayout| -> Vec<u32> {
        layout
            .glyphs()
            .iter()
            .filter(|g| (1..4).contains(&g.char_index))
            .map(|g| g.glyph_id)
            .collect()
    };
    assert_eq!(ids_in(&part), ids_in(&full));
    Ok(())
}

#[test]
fn layout_carries_line_metrics() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let text = "Hg";
    let layout = TextShaper::new(&font, FontSelection::new(16))
        .layout_text(&mut LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?)?;
    let metrics = layout.line_metrics().ok_or_else(|| anyhow::anyhow!("no line metrics"))?;
    assert!(metrics.ascent > 0.0);
    assert_eq!(metrics.font_size, 16.0);
    Ok(())
}

#[test]
fn layout_width_stretches_the_line() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let shaper = TextShaper::new(&font, FontSelection::new(16));
    let text = "Hello";
    let natural = shaper.layout_text(&mut LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?)?;
    let mut args = LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?.with_layout_width(natural.width() * 2);
    let stretched = shaper.layout_text(&mut args)?;

    assert_eq!(stretched.width(), natural.width() * 2);
    assert_eq!(stretched.len(), natural.len());
    Ok(())
}

#[test]
fn dx_array_fixes_character_widths() -> Result<()> {
    let Some(font) = system_font() else {
        return Ok(());
    };
    let shaper = TextShaper::new(&font, FontSelection::new(16));
    let text = "abc";
    let mut args = LayoutArgs::new(text, 0..text.len(), LayoutFlags::empty())?.with_dx_array(vec![12, 24, 36])?;
    let layout = shaper.layout_text(&mut args)?;
    if args.has_fallback_requests() {
        return Ok(());
    }
    assert_eq!(layout.char_widths(text), vec![12, 12, 12]);
    assert_eq!(layout.width(), 36);
    Ok(())
}
