use std::borrow::Cow;
use std::sync::Arc;

use swash::FontRef;

use crate::font::{FaceData, FontError, FontHandle, FontTables, Result, TableTag};

/// Loaded font face backed by a complete font file (TTF/OTF/TTC).
///
/// Owns the file bytes; tables are served straight out of them and the
/// shaper parses the same bytes without copying.
#[derive(Debug, Clone)]
pub struct FontFace {
    /// Full font data.
    data: Arc<[u8]>,
    /// Face index within a collection.
    index: u32,
    /// Diagnostic name.
    name: String,
}

impl FontFace {
    /// Create a font face from raw bytes and a font index within the file.
    pub fn from_bytes(data: Arc<[u8]>, index: u32) -> Result<Self> {
        FontRef::from_index(&data, index as usize).ok_or(FontError::InvalidFont)?;
        Ok(Self {
            data,
            index,
            name: format!("memory font #{index}"),
        })
    }

    /// Create a font face from raw bytes owned by a `Vec<u8>`.
    pub fn from_vec(data: Vec<u8>, index: u32) -> Result<Self> {
        Self::from_bytes(Arc::from(data), index)
    }

    /// Create a font face from a font file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::from_vec(data, index).map(|face| face.with_name(path.display().to_string()))
    }

    /// Replace the diagnostic name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Raw font bytes.
    pub fn as_bytes(&self) -> Arc<[u8]> {
        self.data.clone()
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl FontTables for FontFace {
    fn table(&self, tag: TableTag) -> Option<Cow<'_, [u8]>> {
        let raw = ttf_parser::RawFace::parse(&self.data, self.index).ok()?;
        raw.table(ttf_parser::Tag::from_bytes(&tag)).map(Cow::Borrowed)
    }
}

impl FontHandle for FontFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn face_data(&self) -> Result<FaceData<'_>> {
        Ok(FaceData {
            data: Cow::Borrowed(&self.data),
            index: self.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_not_a_font() {
        let err = FontFace::from_vec(vec![0u8; 16], 0).unwrap_err();
        assert!(matches!(err, FontError::InvalidFont));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FontFace::from_path("/nonexistent/rune-shape/font.ttf", 0).unwrap_err();
        assert!(matches!(err, FontError::Io(_)));
    }
}
