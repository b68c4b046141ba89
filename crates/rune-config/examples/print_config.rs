/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Configuration ===\n");

    println!("Text Settings:");
    println!("  Backend: {:?}", config.text.backend);
    println!("  Font: {:?}", config.text.font);
    println!("  Font Index: {}", config.text.font_index);
    println!("  Family: {:?}", config.text.family);
    println!();

    println!("Shaping Settings:");
    println!("  Pixel Size: {}", config.shaping.pixel_size);
    println!("  Pixel Width: {}", config.shaping.pixel_width);
    println!("  Language: {}", config.shaping.language);
    println!("  Direction: {:?}", config.shaping.direction);
    println!("  Bidi Strong: {}", config.shaping.bidi_strong);
    println!("  Asian Kerning: {}", config.shaping.kerning_asian);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
