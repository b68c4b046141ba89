//! Unicode utilities.
//!
//! Grapheme boundary lookups and the boundary service used to find the
//! user-perceived character around a shaped cluster.

pub mod graphemes;

pub use graphemes::{BoundaryAnalyzer, GraphemeBoundaries, next_grapheme_boundary, prev_grapheme_boundary};
