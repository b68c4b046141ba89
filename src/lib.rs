//! rune: bidi and script aware text layout.
//!
//! Facade over the workspace crates; see [`rune_shape`] for the layout
//! engine and [`config`] for runtime configuration.

pub use rune_config as config;
pub use rune_shape::*;
