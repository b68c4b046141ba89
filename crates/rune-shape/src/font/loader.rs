use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;
use rune_config::{FontBackend, TextConfig};
use tracing::{debug, warn};

use crate::font::{FontError, FontFace, FontHandle, Result, TableFace};

/// Key for identifying a font within the cache.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    /// Path to the font file on disk.
    pub path: PathBuf,
    /// Font index within the file (for collections).
    pub index: u32,
}

impl FontKey {
    pub fn new(path: impl AsRef<Path>, index: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            index,
        }
    }
}

/// Simple in-memory font cache keyed by file path and index.
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: HashMap<FontKey, Arc<FontFace>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Get a font face from the cache or load it from disk.
    pub fn get_or_load(&mut self, path: impl AsRef<Path>, index: u32) -> Result<Arc<FontFace>> {
        let key = FontKey::new(&path, index);
        if let Some(face) = self.fonts.get(&key) {
            return Ok(face.clone());
        }

        let face = Arc::new(FontFace::from_path(&key.path, index)?);
        self.fonts.insert(key, face.clone());
        Ok(face)
    }

    /// Insert an already constructed font face with an explicit key.
    pub fn insert(&mut self, key: FontKey, face: Arc<FontFace>) {
        self.fonts.insert(key, face);
    }

    /// Retrieve a font by key if it exists.
    pub fn get(&self, key: &FontKey) -> Option<Arc<FontFace>> {
        self.fonts.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Find `family` in the system font database and load it.
pub fn load_system_font(family: &str) -> Result<FontFace> {
    load_from_database(fontdb::Family::Name(family), family)
}

/// Load the system's default sans-serif face.
pub fn load_system_default_font() -> Result<FontFace> {
    load_from_database(fontdb::Family::SansSerif, "sans-serif")
}

fn load_from_database(family: fontdb::Family<'_>, label: &str) -> Result<FontFace> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let families = [family];
    let query = fontdb::Query {
        families: &families,
        ..fontdb::Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| FontError::NotFound(label.to_string()))?;
    let (data, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| FontError::NotFound(label.to_string()))?;
    debug!(family = label, faces = db.len(), "loaded system font");
    Ok(FontFace::from_vec(data, index)?.with_name(label.to_string()))
}

/// Build the font handle the configuration selects.
pub fn open_font(config: &TextConfig) -> Result<Box<dyn FontHandle>> {
    let font: Box<dyn FontHandle> = match config.backend {
        FontBackend::File => {
            let path = config
                .font
                .as_ref()
                .ok_or_else(|| FontError::Config("file backend needs `font`".to_string()))?;
            Box::new(FontFace::from_path(path, config.font_index)?)
        }
        FontBackend::Tables => {
            let path = config
                .font
                .as_ref()
                .ok_or_else(|| FontError::Config("tables backend needs `font`".to_string()))?;
            Box::new(TableFace::from_path(path, config.font_index)?)
        }
        FontBackend::System => {
            let face = match config.family.as_deref() {
                Some(family) => load_system_font(family).or_else(|err| {
                    warn!(%err, family, "falling back to default system font");
                    load_system_default_font()
                })?,
                None => load_system_default_font()?,
            };
            Box::new(face)
        }
    };
    debug!(font = font.name(), backend = ?config.backend, "opened font");
    Ok(font)
}
