use core::ops::Range;

use unicode_bidi::BidiInfo;

use crate::bidi::BaseDirection;

/// A run of text with a single resolved direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte range in the original text.
    pub range: Range<usize>,
    pub rtl: bool,
}

impl BidiRun {
    pub fn new(range: Range<usize>, rtl: bool) -> Self {
        Self { range, rtl }
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }
}

/// Forward-only supply of directional runs.
pub trait BidiRunSource {
    fn next_run(&mut self) -> Option<BidiRun>;
}

/// Compute the directional runs of `range` in visual order.
///
/// `range` may span several paragraphs; each paragraph's part is reordered
/// on its own and paragraphs follow each other in logical order.
pub fn visual_runs(text: &str, base_dir: BaseDirection, range: Range<usize>) -> Vec<BidiRun> {
    if range.is_empty() {
        return Vec::new();
    }
    let info = BidiInfo::new(text, base_dir.to_level());
    let mut out = Vec::new();
    for para in &info.paragraphs {
        let line = range.start.max(para.range.start)..range.end.min(para.range.end);
        if line.is_empty() {
            continue;
        }
        let (levels, runs) = info.visual_runs(para, line);
        out.extend(
            runs.into_iter()
                .filter(|run| !run.is_empty())
                .map(|run| {
                    let rtl = levels[run.start].is_rtl();
                    BidiRun::new(run, rtl)
                }),
        );
    }
    out
}

/// Ordered list of runs with a read cursor.
///
/// Serves both as the directional runs of a layout call and as the sink
/// collecting ranges that need a fallback font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutRuns {
    runs: Vec<BidiRun>,
    cursor: usize,
}

impl LayoutRuns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_runs(runs: Vec<BidiRun>) -> Self {
        Self { runs, cursor: 0 }
    }

    /// Append a run; empty ranges are ignored.
    pub fn add_run(&mut self, range: Range<usize>, rtl: bool) {
        if !range.is_empty() {
            self.runs.push(BidiRun::new(range, rtl));
        }
    }

    /// Append a run, folding it into the previous one when both share a
    /// direction and touch or overlap.
    pub fn merge_run(&mut self, range: Range<usize>, rtl: bool) {
        if range.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.rtl == rtl && range.start <= last.range.end && last.range.start <= range.end {
                last.range = last.range.start.min(range.start)..last.range.end.max(range.end);
                return;
            }
        }
        self.runs.push(BidiRun::new(range, rtl));
    }

    /// Append the character at `range`, extending the last run when the
    /// character continues it in reading order.
    pub fn add_pos(&mut self, range: Range<usize>, rtl: bool) {
        if let Some(last) = self.runs.last_mut() {
            if last.rtl == rtl {
                if !rtl && last.range.end == range.start {
                    last.range.end = range.end;
                    return;
                }
                if rtl && range.end == last.range.start {
                    last.range.start = range.start;
                    return;
                }
            }
        }
        self.add_run(range, rtl);
    }

    pub fn runs(&self) -> &[BidiRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
        self.cursor = 0;
    }

    /// Rewind the read cursor.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn take(&mut self) -> Vec<BidiRun> {
        self.cursor = 0;
        std::mem::take(&mut self.runs)
    }
}

impl BidiRunSource for LayoutRuns {
    fn next_run(&mut self) -> Option<BidiRun> {
        let run = self.runs.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(run)
    }
}
