//! Memoized script segmentation.
//!
//! Script analysis only depends on the text, so a caller laying out the same
//! string several times (a first pass and a fallback pass, or repeated
//! measurement) builds the runs once and hands the cache back in.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::script::{Run, script_runs};

/// Script runs of one string, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayoutCache {
    runs: Vec<Run>,
    text_len: usize,
    text_hash: u64,
}

impl TextLayoutCache {
    /// Segment `text` into script runs.
    pub fn build(text: &str) -> Self {
        Self {
            runs: script_runs(text),
            text_len: text.len(),
            text_hash: hash_text(text),
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Whether this cache was built from `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.text_len == text.len() && self.text_hash == hash_text(text)
    }
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_deterministic() {
        let text = "Hello עברית 123 日本語";
        assert_eq!(TextLayoutCache::build(text), TextLayoutCache::build(text));
    }

    #[test]
    fn matches_only_its_own_text() {
        let cache = TextLayoutCache::build("abc");
        assert!(cache.matches("abc"));
        assert!(!cache.matches("abd"));
        assert!(!cache.matches("abcd"));
    }

    #[test]
    fn runs_cover_text() {
        let text = "abc Ωμέγα";
        let cache = TextLayoutCache::build(text);
        assert_eq!(cache.runs().first().map(|r| r.start), Some(0));
        assert_eq!(cache.runs().last().map(|r| r.end), Some(text.len()));
    }
}
