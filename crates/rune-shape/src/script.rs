//! Script itemization.
//!
//! Splits text into maximal runs of one Unicode script. Common and inherited
//! characters (spaces, digits, punctuation, combining marks) join the run
//! around them, and a closing bracket takes the script of its opening
//! bracket so that `(عربي)` inside Latin text does not leave the parenthesis
//! stranded in the Arabic run.

use core::ops::Range;

use unicode_script::{Script, UnicodeScript};

/// A run of text with a single resolved script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset past the last character.
    pub end: usize,
    pub script: Script,
}

impl Run {
    pub fn new(start: usize, end: usize, script: Script) -> Self {
        Self { start, end, script }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// Opening characters sit at even indices, their closing partner right after.
const PAIRED_CHARS: &[char] = &[
    '\u{0028}', '\u{0029}', // ( )
    '\u{003C}', '\u{003E}', // < >
    '\u{005B}', '\u{005D}', // [ ]
    '\u{007B}', '\u{007D}', // { }
    '\u{00AB}', '\u{00BB}', // « »
    '\u{2018}', '\u{2019}', // ‘ ’
    '\u{201C}', '\u{201D}', // “ ”
    '\u{2039}', '\u{203A}', // ‹ ›
    '\u{3008}', '\u{3009}', // 〈 〉
    '\u{300A}', '\u{300B}', // 《 》
    '\u{300C}', '\u{300D}', // 「 」
    '\u{300E}', '\u{300F}', // 『 』
    '\u{3010}', '\u{3011}', // 【 】
    '\u{3014}', '\u{3015}', // 〔 〕
    '\u{3016}', '\u{3017}', // 〖 〗
    '\u{3018}', '\u{3019}', // 〘 〙
    '\u{301A}', '\u{301B}', // 〚 〛
];

// Deep enough for real text; older entries are dropped when it overflows.
const PAREN_STACK_DEPTH: usize = 128;

fn pair_index(ch: char) -> Option<usize> {
    PAIRED_CHARS.iter().position(|&c| c == ch)
}

fn is_weak(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited)
}

fn same_script(a: Script, b: Script) -> bool {
    is_weak(a) || is_weak(b) || a == b
}

#[derive(Debug, Clone, Copy)]
struct ParenEntry {
    pair: usize,
    script: Script,
}

/// Lazy iterator over the script runs of a string.
///
/// Clone it to restart from where the clone was taken.
#[derive(Debug, Clone)]
pub struct ScriptRuns<'a> {
    text: &'a str,
    pos: usize,
    stack: Vec<ParenEntry>,
}

impl<'a> ScriptRuns<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            stack: Vec::new(),
        }
    }

    fn push_paren(&mut self, pair: usize, script: Script) {
        if self.stack.len() == PAREN_STACK_DEPTH {
            self.stack.remove(0);
        }
        self.stack.push(ParenEntry { pair, script });
    }
}

impl Iterator for ScriptRuns<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        if self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        let mut run_script = Script::Common;
        // Entries pushed at or above this depth were opened inside the current
        // run while its script was still unresolved.
        let mut resolved_depth = self.stack.len();

        for (offset, ch) in self.text[start..].char_indices() {
            let mut script = ch.script();
            let pair = pair_index(ch);

            if let Some(pair) = pair {
                if pair % 2 == 0 {
                    self.push_paren(pair, run_script);
                } else {
                    let open = pair - 1;
                    while self.stack.last().is_some_and(|e| e.pair != open) {
                        self.stack.pop();
                    }
                    resolved_depth = resolved_depth.min(self.stack.len());
                    if let Some(entry) = self.stack.last() {
                        script = entry.script;
                    }
                }
            }

            if !same_script(run_script, script) {
                self.pos = start + offset;
                return Some(Run::new(start, self.pos, run_script));
            }

            if is_weak(run_script) && !is_weak(script) {
                run_script = script;
                for entry in &mut self.stack[resolved_depth..] {
                    entry.script = run_script;
                }
                resolved_depth = self.stack.len();
            }

            if pair.is_some_and(|p| p % 2 == 1) && !self.stack.is_empty() {
                self.stack.pop();
                resolved_depth = resolved_depth.min(self.stack.len());
            }
        }

        self.pos = self.text.len();
        Some(Run::new(start, self.pos, run_script))
    }
}

/// Materialize the script runs of `text`, merging neighbours that ended up
/// with the same script.
pub fn script_runs(text: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for run in ScriptRuns::new(text) {
        match runs.last_mut() {
            Some(last) if last.script == run.script && last.end == run.start => last.end = run.end,
            _ => runs.push(run),
        }
    }
    runs
}

/// ISO 15924 tag of a script, e.g. `*b"Latn"`.
pub fn iso15924_tag(script: Script) -> [u8; 4] {
    let mut tag = *b"Zzzz";
    let name = script.short_name().as_bytes();
    if name.len() == 4 {
        tag.copy_from_slice(name);
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripts(text: &str) -> Vec<(String, Script)> {
        script_runs(text)
            .into_iter()
            .map(|r| (text[r.range()].to_string(), r.script))
            .collect()
    }

    #[test]
    fn empty_text_has_no_runs() {
        assert!(script_runs("").is_empty());
    }

    #[test]
    fn single_latin_run() {
        let runs = script_runs("Hello, world 42!");
        assert_eq!(runs, vec![Run::new(0, 16, Script::Latin)]);
    }

    #[test]
    fn latin_then_hebrew() {
        let runs = scripts("Helloעברית");
        assert_eq!(
            runs,
            vec![
                ("Hello".to_string(), Script::Latin),
                ("עברית".to_string(), Script::Hebrew),
            ]
        );
    }

    #[test]
    fn leading_common_joins_first_script() {
        let runs = scripts("123 abc");
        assert_eq!(runs, vec![("123 abc".to_string(), Script::Latin)]);
    }

    #[test]
    fn only_common_is_tagged_common() {
        assert_eq!(script_runs("1 + 2 = 3")[0].script, Script::Common);
    }

    #[test]
    fn combining_mark_stays_with_base() {
        let runs = scripts("abc\u{0301}d");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].1, Script::Latin);
    }

    #[test]
    fn closing_bracket_takes_opening_script() {
        // The ')' follows Arabic but belongs to the Latin run opened before it.
        let text = "ab (عربي) cd";
        let runs = scripts(text);
        assert_eq!(runs[0], ("ab (".to_string(), Script::Latin));
        assert_eq!(runs[1], ("عربي".to_string(), Script::Arabic));
        assert_eq!(runs[2], (") cd".to_string(), Script::Latin));
    }

    #[test]
    fn runs_cover_text_without_adjacent_duplicates() {
        for text in ["", "a", "日本語とEnglishと한국어", "Ελληνικά русский עברית 中文", "(([[x]]))"] {
            let runs = script_runs(text);
            let mut cursor = 0;
            for run in &runs {
                assert_eq!(run.start, cursor);
                assert!(run.end > run.start);
                assert!(text.is_char_boundary(run.end));
                cursor = run.end;
            }
            assert_eq!(cursor, text.len());
            for pair in runs.windows(2) {
                assert_ne!(pair[0].script, pair[1].script);
            }
        }
    }

    #[test]
    fn iterator_restarts_from_clone() {
        let text = "abc Ωμέγα";
        let mut iter = ScriptRuns::new(text);
        let saved = iter.clone();
        let first: Vec<Run> = iter.by_ref().collect();
        let second: Vec<Run> = saved.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn tags() {
        assert_eq!(&iso15924_tag(Script::Latin), b"Latn");
        assert_eq!(&iso15924_tag(Script::Hebrew), b"Hebr");
        assert_eq!(&iso15924_tag(Script::Common), b"Zyyy");
    }
}
