//! Font handles.
//!
//! A layout call sees a font only through [`FontHandle`]: a table provider
//! plus the bytes the shaper parses. Each backend (whole file in memory,
//! system database lookup, table-at-a-time provider) is one implementation,
//! chosen when the configuration is read.

pub mod face;
pub mod gdef;
pub mod loader;
pub mod metrics;
pub mod sfnt;
pub mod tables;

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

pub use face::FontFace;
pub use gdef::{GdefClasses, GlyphClass, GlyphClassSource};
pub use loader::{FontCache, FontKey, load_system_default_font, load_system_font, open_font};
pub use metrics::{FontMetrics, FontSelection, ScaledFontMetrics};
pub use tables::TableFace;

/// A four byte OpenType table tag such as `*b"cmap"`.
pub type TableTag = [u8; 4];

/// Errors that can occur while working with fonts.
#[derive(Error, Debug)]
pub enum FontError {
    /// Reading font data failed.
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a usable font.
    #[error("invalid font data")]
    InvalidFont,

    /// No installed font matches the requested family.
    #[error("no system font found for family {0:?}")]
    NotFound(String),

    /// A table the shaper cannot work without is absent.
    #[error("font has no {} table", DisplayTag(.0))]
    MissingTable(TableTag),

    /// The configuration does not name a font for the selected backend.
    #[error("font configuration incomplete: {0}")]
    Config(String),
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;

/// Formats a tag as its four ASCII characters.
pub struct DisplayTag<'a>(pub &'a TableTag);

impl fmt::Display for DisplayTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Source of raw font tables.
///
/// The same tag must yield the same bytes for as long as the provider is
/// borrowed by a layout call. An absent table is `None`, never an error.
pub trait FontTables {
    fn table(&self, tag: TableTag) -> Option<Cow<'_, [u8]>>;
}

/// Bytes of a complete font face, ready for the shaper.
#[derive(Debug, Clone)]
pub struct FaceData<'a> {
    pub data: Cow<'a, [u8]>,
    /// Face index within a collection.
    pub index: u32,
}

/// A font usable by one layout call.
pub trait FontHandle: FontTables + Send + Sync {
    /// Human readable name for diagnostics.
    fn name(&self) -> &str;

    /// Face bytes for the shaping engine.
    ///
    /// The default assembles a standalone font from the tables this handle
    /// provides, which is what table-only backends need.
    fn face_data(&self) -> Result<FaceData<'_>> {
        let data = sfnt::assemble(self)?;
        Ok(FaceData {
            data: Cow::Owned(data),
            index: 0,
        })
    }
}
