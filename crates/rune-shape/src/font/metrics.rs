use rune_config::ShapingConfig;
use swash::{FontRef, Metrics};

use crate::font::{FontError, Result};

/// Number of fractional bits in the shaper's fixed-point output (26.6).
pub const FIXED_SHIFT: u32 = 6;

/// Font-level metrics in font units.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub line_gap: f32,
    pub units_per_em: u16,
}

impl FontMetrics {
    /// Read the default-instance metrics of face `index` in `data`.
    pub fn read(data: &[u8], index: u32) -> Result<Self> {
        let font = FontRef::from_index(data, index as usize).ok_or(FontError::InvalidFont)?;
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            ..
        } = font.metrics(&[]);
        Ok(Self {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
        })
    }

    /// Scale metrics to pixel size, where `font_size` is in pixels per em.
    pub fn scale_to_pixels(&self, font_size: f32) -> ScaledFontMetrics {
        let scale = if self.units_per_em != 0 {
            font_size / self.units_per_em as f32
        } else {
            1.0
        };
        ScaledFontMetrics {
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            line_gap: self.line_gap * scale,
            font_size,
        }
    }
}

/// Scaled font metrics in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub font_size: f32,
}

impl ScaledFontMetrics {
    /// Ascent + descent + line gap.
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

/// Pixel size a font is laid out at.
///
/// A `width` of zero means the font is not stretched: horizontal pixels per
/// em follow `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSelection {
    pub width: u32,
    pub height: u32,
}

impl FontSelection {
    pub fn new(height: u32) -> Self {
        Self { width: 0, height }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn from_config(config: &ShapingConfig) -> Self {
        Self {
            width: config.pixel_width,
            height: config.pixel_size,
        }
    }

    /// Horizontal pixels per em.
    pub fn ppem_x(&self) -> u32 {
        if self.width != 0 { self.width } else { self.height }
    }

    /// Vertical pixels per em.
    pub fn ppem_y(&self) -> u32 {
        self.height
    }

    /// Horizontal 26.6 scale: design units map to `ppem_x << 6` per em.
    pub fn scale_x(&self) -> i64 {
        (self.ppem_x() as i64) << FIXED_SHIFT
    }

    /// Vertical 26.6 scale.
    pub fn scale_y(&self) -> i64 {
        (self.ppem_y() as i64) << FIXED_SHIFT
    }
}

/// Convert a design-unit value to 26.6 fixed point, rounding half away from zero.
pub fn to_fixed(value: i32, scale: i64, units_per_em: u16) -> i32 {
    let upem = units_per_em.max(1) as i64;
    let scaled = value as i64 * scale;
    let rounded = if scaled >= 0 {
        (scaled + upem / 2) / upem
    } else {
        (scaled - upem / 2) / upem
    };
    rounded.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Drop the fractional bits of a 26.6 value.
pub fn from_fixed(value: i32) -> i32 {
    value >> FIXED_SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_follows_height() {
        let sel = FontSelection::new(12);
        assert_eq!(sel.ppem_x(), 12);
        assert_eq!(sel.ppem_y(), 12);
        assert_eq!(sel.with_width(20).ppem_x(), 20);
        assert_eq!(sel.scale_x(), 12 * 64);
    }

    #[test]
    fn design_units_to_fixed() {
        // 1000 upem at 16px: half an em is 8px, i.e. 512 in 26.6
        assert_eq!(to_fixed(500, FontSelection::new(16).scale_x(), 1000), 512);
        assert_eq!(to_fixed(-500, FontSelection::new(16).scale_x(), 1000), -512);
        assert_eq!(from_fixed(512), 8);
    }

    #[test]
    fn metrics_scale_with_pixel_size() {
        let metrics = FontMetrics {
            ascent: 800.0,
            descent: 200.0,
            line_gap: 100.0,
            units_per_em: 1000,
        };
        let scaled = metrics.scale_to_pixels(20.0);
        assert_eq!(scaled.ascent, 16.0);
        assert_eq!(scaled.descent, 4.0);
        assert_eq!(scaled.line_height(), 22.0);
    }

    #[test]
    fn garbage_has_no_metrics() {
        assert!(matches!(FontMetrics::read(&[0u8; 16], 0), Err(FontError::InvalidFont)));
    }

    #[test]
    fn from_fixed_floors_negative_values() {
        // arithmetic shift, same as the shaper's integer conversion
        assert_eq!(from_fixed(-1), -1);
        assert_eq!(from_fixed(-64), -1);
        assert_eq!(from_fixed(63), 0);
    }
}
