//! Intersection of directional runs with script runs.
//!
//! The shaper only accepts text of one script in one direction, so every
//! bidi run is cut at the script boundaries that fall inside it.

use core::ops::Range;

use smallvec::SmallVec;
use unicode_script::Script;

use crate::script::Run;

/// A script run clipped to one bidi run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subrun {
    pub start: usize,
    pub end: usize,
    pub script: Script,
}

impl Subrun {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

pub type Subruns = SmallVec<[Subrun; 8]>;

/// Cut `bidi` at the script boundaries in `runs`.
///
/// Subruns come back in the order they must be shaped: logical order for
/// left-to-right runs, reversed for right-to-left runs so glyph output
/// follows the visual order.
pub fn script_subruns(runs: &[Run], bidi: Range<usize>, rtl: bool) -> Subruns {
    let mut out = Subruns::new();
    let mut current = bidi.start;
    let Some(mut k) = runs.iter().position(|run| run.contains(current)) else {
        return out;
    };

    while current < bidi.end && k < runs.len() {
        let end = runs[k].end.min(bidi.end);
        out.push(Subrun {
            start: current,
            end,
            script: runs[k].script,
        });
        current = end;
        k += 1;
    }

    if rtl {
        out.reverse();
    }
    out
}
