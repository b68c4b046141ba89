use rune_config::{FontBackend, RuneConfig};
use rune_shape::{FontHandle, FontSelection, LayoutArgs, TextShaper, open_font};

/// Shape a line of text with the configured font and print the glyphs.
///
/// Run with: cargo run -p rune-shape --example shape_demo -- "Hello עברית"
fn main() {
    let mut config = RuneConfig::load();
    if config.text.font.is_none() {
        config.text.backend = FontBackend::System;
    }
    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello, עולם! e\u{301}".to_string());

    let font = open_font(&config.text).expect("Failed to open font");
    let shaper = TextShaper::new(font.as_ref(), FontSelection::from_config(&config.shaping));

    let mut args = LayoutArgs::from_config(&text, 0..text.len(), &config.shaping).expect("Invalid range");

    println!("=== Shaping Demo ===\n");
    println!("Font: {}", font.name());
    println!("Text: {:?}", text);
    println!("Runs: {:?}\n", args.runs());

    let layout = shaper.layout_text(&mut args).expect("Layout failed");

    println!("--- Glyphs (logical order) ---");
    for glyph in layout.glyphs() {
        let ch = text[glyph.char_index..].chars().next().unwrap_or('∅');
        println!(
            "  char {:>3} {:?}  gid {:>5}  pos ({:>4}, {:>3})  adv {:>3}  {:?}",
            glyph.char_index, ch, glyph.glyph_id, glyph.position.x, glyph.position.y, glyph.x_advance, glyph.flags
        );
    }

    println!("\nWidth: {}px", layout.width());
    println!("Char widths: {:?}", layout.char_widths(&text));
    if let Some(metrics) = layout.line_metrics() {
        println!("Line height: {:.1}px (ascent {:.1})", metrics.line_height(), metrics.ascent);
    }

    if args.prepare_fallback() {
        println!("\n--- Needs fallback ---");
        for run in args.runs() {
            println!("  {:?} {:?} rtl={}", run.range, &text[run.range.clone()], run.rtl);
        }
    }
}
