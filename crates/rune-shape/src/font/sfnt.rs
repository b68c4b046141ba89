//! Rebuild a standalone font file from individually provided tables.
//!
//! Backends that only expose a table-at-a-time interface still need to hand
//! the shaper a complete face; this writes the tables the shaper and layout
//! read into a fresh sfnt container.

use crate::font::{FontError, FontTables, Result, TableTag};

/// Tables read during shaping, glyph classification and metric lookup.
pub const SHAPING_TABLES: &[TableTag] = &[
    *b"OS/2", *b"CFF ", *b"CFF2", *b"GDEF", *b"GPOS", *b"GSUB", *b"HVAR", *b"MATH", *b"MVAR",
    *b"STAT", *b"VORG", *b"VVAR", *b"ankr", *b"avar", *b"cmap", *b"feat", *b"fvar", *b"glyf",
    *b"gvar", *b"head", *b"hhea", *b"hmtx", *b"kern", *b"kerx", *b"loca", *b"maxp", *b"morx",
    *b"name", *b"post", *b"trak", *b"vhea", *b"vmtx",
];

/// Tables without which no face can be shaped.
pub const REQUIRED_TABLES: &[TableTag] = &[*b"cmap", *b"head", *b"hhea", *b"hmtx", *b"maxp"];

const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;

/// Assemble an sfnt blob from the tables `tables` provides.
pub fn assemble<T: FontTables + ?Sized>(tables: &T) -> Result<Vec<u8>> {
    let mut present: Vec<(TableTag, Vec<u8>)> = Vec::new();
    for &tag in SHAPING_TABLES {
        if let Some(data) = tables.table(tag) {
            present.push((tag, data.into_owned()));
        }
    }
    for tag in REQUIRED_TABLES {
        if !present.iter().any(|(t, _)| t == tag) {
            return Err(FontError::MissingTable(*tag));
        }
    }
    // Table records must be sorted by tag.
    present.sort_by(|a, b| a.0.cmp(&b.0));

    let is_cff = present.iter().any(|(t, _)| t == b"CFF " || t == b"CFF2");
    let version: u32 = if is_cff { u32::from_be_bytes(*b"OTTO") } else { 0x0001_0000 };

    let num_tables = present.len() as u16;
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;

    let directory_len = HEADER_LEN + RECORD_LEN * present.len();
    let body_len: usize = present.iter().map(|(_, d)| padded_len(d.len())).sum();
    let mut out = Vec::with_capacity(directory_len + body_len);

    out.extend_from_slice(&version.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = directory_len;
    for (tag, data) in &present {
        out.extend_from_slice(tag);
        out.extend_from_slice(&checksum(data).to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += padded_len(data.len());
    }
    for (_, data) in &present {
        out.extend_from_slice(data);
        out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
    }
    Ok(out)
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use hashbrown::HashMap;

    use super::*;

    struct Tables(HashMap<TableTag, Vec<u8>>);

    impl FontTables for Tables {
        fn table(&self, tag: TableTag) -> Option<Cow<'_, [u8]>> {
            self.0.get(&tag).map(|d| Cow::Borrowed(d.as_slice()))
        }
    }

    fn minimal() -> Tables {
        let mut map = HashMap::new();
        for tag in REQUIRED_TABLES {
            map.insert(*tag, vec![1, 2, 3]);
        }
        map.insert(*b"GSUB", vec![9; 8]);
        Tables(map)
    }

    fn read_u16(data: &[u8], at: usize) -> u16 {
        u16::from_be_bytes([data[at], data[at + 1]])
    }

    fn read_u32(data: &[u8], at: usize) -> u32 {
        u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
    }

    #[test]
    fn writes_sorted_directory() {
        let blob = assemble(&minimal()).unwrap();
        assert_eq!(read_u32(&blob, 0), 0x0001_0000);
        assert_eq!(read_u16(&blob, 4), 6);
        // 6 tables: entrySelector 2, searchRange 64, rangeShift 32
        assert_eq!(read_u16(&blob, 6), 64);
        assert_eq!(read_u16(&blob, 8), 2);
        assert_eq!(read_u16(&blob, 10), 32);

        let tags: Vec<&[u8]> = (0..6)
            .map(|i| &blob[HEADER_LEN + i * RECORD_LEN..HEADER_LEN + i * RECORD_LEN + 4])
            .collect();
        let mut sorted = tags.clone();
        sorted.sort();
        assert_eq!(tags, sorted);
        assert_eq!(tags[0], b"GSUB");
    }

    #[test]
    fn table_data_is_four_byte_aligned() {
        let blob = assemble(&minimal()).unwrap();
        for i in 0..6 {
            let record = HEADER_LEN + i * RECORD_LEN;
            let offset = read_u32(&blob, record + 8) as usize;
            let len = read_u32(&blob, record + 12) as usize;
            assert_eq!(offset % 4, 0);
            assert!(offset + len <= blob.len());
        }
        assert_eq!(blob.len() % 4, 0);
    }

    #[test]
    fn missing_cmap_is_reported() {
        let mut tables = minimal();
        tables.0.remove(b"cmap");
        let err = assemble(&tables).unwrap_err();
        assert!(matches!(err, FontError::MissingTable(tag) if &tag == b"cmap"));
    }

    #[test]
    fn checksum_pads_tail() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0x80]), 1 + 0x8000_0000);
    }
}
