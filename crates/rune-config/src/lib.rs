//! Rune configuration system
//!
//! This crate provides centralized configuration for the rune glyph layout
//! engine, loading settings from `rune.toml` with environment variable
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Font selection settings
    pub text: TextConfig,
    /// Shaping and layout settings
    pub shaping: ShapingConfig,
}

/// Which font handle implementation backs a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontBackend {
    /// A font file on disk, read fully into memory.
    #[default]
    File,
    /// A family looked up in the system font database.
    System,
    /// A font file on disk, exposed table-by-table and reassembled for the shaper.
    Tables,
}

impl FontBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "system" => Some(Self::System),
            "tables" => Some(Self::Tables),
            _ => None,
        }
    }
}

/// Paragraph base direction requested for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DirectionConfig {
    /// Detect from the first strong character.
    Auto,
    #[default]
    Ltr,
    Rtl,
}

impl DirectionConfig {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "ltr" => Some(Self::Ltr),
            "rtl" => Some(Self::Rtl),
            _ => None,
        }
    }
}

/// Font selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Font handle implementation
    pub backend: FontBackend,
    /// Path to a font file (.ttf/.otf/.ttc), used by the `file` and `tables` backends
    pub font: Option<PathBuf>,
    /// Face index within a font collection
    pub font_index: u32,
    /// Family name, used by the `system` backend (sans-serif when unset)
    pub family: Option<String>,
}

/// Shaping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    /// Font height in pixels per em
    pub pixel_size: u32,
    /// Font width in pixels per em (0 means same as `pixel_size`)
    pub pixel_width: u32,
    /// BCP 47 language tag used for language-specific shaping
    pub language: String,
    /// Paragraph base direction
    pub direction: DirectionConfig,
    /// Treat the whole range as a single run in the base direction, skipping bidi analysis
    pub bidi_strong: bool,
    /// Compress adjacent CJK punctuation when fitting text to requested widths
    pub kerning_asian: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            backend: FontBackend::File,
            font: None,
            font_index: 0,
            family: None,
        }
    }
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            pixel_size: 16,
            pixel_width: 0,
            language: "en".to_string(),
            direction: DirectionConfig::Ltr,
            bidi_strong: false,
            kerning_asian: false,
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the rune.toml configuration file
    ///
    /// # Returns
    /// * `Ok(RuneConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("rune.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        // Font settings
        if let Ok(val) = std::env::var("RUNE_TEXT_BACKEND") {
            if let Some(backend) = FontBackend::parse(&val) {
                self.text.backend = backend;
            }
        }
        if let Ok(font) = std::env::var("RUNE_TEXT_FONT") {
            self.text.font = Some(PathBuf::from(font));
        }
        if let Ok(val) = std::env::var("RUNE_TEXT_FONT_INDEX") {
            if let Ok(index) = val.parse::<u32>() {
                self.text.font_index = index;
            }
        }
        if let Ok(family) = std::env::var("RUNE_TEXT_FAMILY") {
            self.text.family = Some(family);
        }

        // Shaping settings
        if let Ok(val) = std::env::var("RUNE_SHAPE_SIZE") {
            if let Ok(size) = val.parse::<u32>() {
                self.shaping.pixel_size = size;
            }
        }
        if let Ok(val) = std::env::var("RUNE_SHAPE_WIDTH") {
            if let Ok(width) = val.parse::<u32>() {
                self.shaping.pixel_width = width;
            }
        }
        if let Ok(lang) = std::env::var("RUNE_SHAPE_LANGUAGE") {
            self.shaping.language = lang;
        }
        if let Ok(val) = std::env::var("RUNE_SHAPE_DIRECTION") {
            if let Some(direction) = DirectionConfig::parse(&val) {
                self.shaping.direction = direction;
            }
        }
        if let Ok(val) = std::env::var("RUNE_SHAPE_BIDI_STRONG") {
            self.shaping.bidi_strong = env_flag(&val);
        }
        if let Ok(val) = std::env::var("RUNE_SHAPE_KERNING_ASIAN") {
            self.shaping.kerning_asian = env_flag(&val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
