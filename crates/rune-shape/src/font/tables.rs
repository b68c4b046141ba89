use std::borrow::Cow;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::font::sfnt::SHAPING_TABLES;
use crate::font::{FontHandle, FontTables, Result, TableTag};

/// A font known only through its tables.
///
/// Models platforms that hand out one table at a time instead of the font
/// file. The shaper receives a face reassembled from these tables.
#[derive(Debug, Clone, Default)]
pub struct TableFace {
    tables: HashMap<TableTag, Arc<[u8]>>,
    name: String,
}

impl TableFace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            tables: HashMap::new(),
            name: name.into(),
        }
    }

    /// Copy every table the shaper reads out of another provider.
    pub fn from_tables(source: &impl FontTables, name: impl Into<String>) -> Self {
        let mut face = Self::new(name);
        for &tag in SHAPING_TABLES {
            if let Some(data) = source.table(tag) {
                face.insert(tag, Arc::from(data.into_owned()));
            }
        }
        face
    }

    /// Read a font file and keep only its tables.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: u32) -> Result<Self> {
        let path = path.as_ref();
        let file = crate::font::FontFace::from_path(path, index)?;
        Ok(Self::from_tables(&file, path.display().to_string()))
    }

    pub fn insert(&mut self, tag: TableTag, data: Arc<[u8]>) {
        self.tables.insert(tag, data);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FontTables for TableFace {
    fn table(&self, tag: TableTag) -> Option<Cow<'_, [u8]>> {
        self.tables.get(&tag).map(|data| Cow::Borrowed(&data[..]))
    }
}

impl FontHandle for TableFace {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontError;

    #[test]
    fn absent_table_is_none() {
        let mut face = TableFace::new("test");
        face.insert(*b"cmap", Arc::from(vec![0u8, 1]));
        assert_eq!(face.table(*b"cmap").as_deref(), Some(&[0u8, 1][..]));
        assert!(face.table(*b"GSUB").is_none());
        assert_eq!(face.len(), 1);
    }

    #[test]
    fn incomplete_face_cannot_be_assembled() {
        let face = TableFace::new("empty");
        let err = face.face_data().unwrap_err();
        assert!(matches!(err, FontError::MissingTable(_)));
    }
}
