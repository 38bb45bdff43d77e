//! Vertical font metrics and synthetic style allowances.

use super::glyph::scale;
use folio_traits::FontMetrics;

/// Applied to typographic metrics when the Windows ones are unusable.
pub const TYPO_ASCENDER_SCALE: f32 = 1.2;

/// Horizontal shear of simulated italics, per point of font size.
pub const ITALIC_ANGLE: f32 = 0.21256;

/// Stroke width of simulated bold, per point of font size.
pub const BOLD_SIMULATION_STROKE: f32 = 1.0 / 30.0;

/// Ascender and descender in 1/1000 em.
///
/// Windows metrics are used directly unless either is zero or they merely
/// repeat the typographic values, in which case the typographic values are
/// scaled by [`TYPO_ASCENDER_SCALE`].
pub fn ascender_descender(metrics: &FontMetrics) -> (f32, f32) {
    let degenerate = metrics.win_ascender == 0.0
        || metrics.win_descender == 0.0
        || (metrics.typo_ascender == metrics.win_ascender
            && metrics.typo_descender == metrics.win_descender);
    if degenerate {
        (
            metrics.typo_ascender * TYPO_ASCENDER_SCALE,
            metrics.typo_descender * TYPO_ASCENDER_SCALE,
        )
    } else {
        (metrics.win_ascender, metrics.win_descender)
    }
}

/// Line metrics of one font at one size, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    pub ascent: f32,
    /// Negative below the baseline.
    pub descent: f32,
}

impl LineMetrics {
    pub fn for_font(metrics: &FontMetrics, font_size: f32, text_rise: f32) -> Self {
        let (ascender, descender) = ascender_descender(metrics);
        Self {
            ascent: scale(ascender, font_size) + text_rise,
            descent: scale(descender, font_size),
        }
    }

    pub fn height(&self) -> f32 {
        self.ascent - self.descent
    }

    pub fn merge(&self, other: &LineMetrics) -> LineMetrics {
        LineMetrics {
            ascent: self.ascent.max(other.ascent),
            descent: self.descent.min(other.descent),
        }
    }
}
