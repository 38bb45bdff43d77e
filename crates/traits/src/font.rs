//! FontProvider trait for abstracting font discovery and shaping.
//!
//! Layout consumes fonts through two seams: a [`FontProvider`] that turns a
//! family/weight/style query into a font, and the resulting [`FontProgram`]
//! that shapes text into [`Glyph`]s and reports metrics.

use folio_style::font::{FontStyle, FontWeight};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Glyph widths and metrics are expressed in thousandths of an em.
pub const TEXT_SPACE_COEFF: f32 = 1000.0;

/// Error type for font resolution.
#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("No font registered for family '{0}'")]
    NotFound(String),

    #[error("Failed to parse font '{name}': {message}")]
    Parse { name: String, message: String },

    #[error("Font registry unavailable: {0}")]
    Registry(String),
}

/// A shaped glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub id: u16,
    /// Advance width in 1/1000 em.
    pub width: f32,
    /// Positional adjustment applied after this glyph (kerning), in 1/1000 em.
    #[serde(default)]
    pub x_advance: f32,
    /// The character this glyph renders, when it maps to a single one.
    pub unicode: Option<char>,
}

impl Glyph {
    pub fn new(id: u16, width: f32, unicode: Option<char>) -> Self {
        Self {
            id,
            width,
            x_advance: 0.0,
            unicode,
        }
    }

    pub fn is_newline(&self) -> bool {
        matches!(self.unicode, Some('\n') | Some('\r') | Some('\u{2028}'))
    }

    pub fn is_whitespace(&self) -> bool {
        self.unicode.is_some_and(char::is_whitespace)
    }

    pub fn is_space(&self) -> bool {
        matches!(self.unicode, Some(' ') | Some('\u{00A0}'))
    }
}

/// Font-wide vertical metrics in 1/1000 em. Descenders are negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FontMetrics {
    pub typo_ascender: f32,
    pub typo_descender: f32,
    /// OS/2 `usWinAscent`, zero when the table is missing.
    pub win_ascender: f32,
    /// Negated OS/2 `usWinDescent`, zero when the table is missing.
    pub win_descender: f32,
    pub underline_position: f32,
    pub underline_thickness: f32,
}

/// Query parameters for font lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontQuery {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontQuery {
    pub fn new(family: impl Into<String>, weight: FontWeight, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            weight,
            style,
        }
    }

    pub fn regular(family: impl Into<String>) -> Self {
        Self::new(family, FontWeight::Regular, FontStyle::Normal)
    }

    fn matches_family(&self, other: &FontQuery) -> bool {
        self.family.eq_ignore_ascii_case(&other.family)
    }
}

/// A loaded font able to shape text.
pub trait FontProgram: Debug + Send + Sync {
    /// Name used when selecting the font on a canvas.
    fn postscript_name(&self) -> &str;

    fn metrics(&self) -> FontMetrics;

    /// Shapes `text` into glyphs in logical order, applying kerning and the
    /// font's default features.
    fn shape(&self, text: &str) -> Vec<Glyph>;

    /// Looks up the glyph for a single character (used for hyphen symbols).
    fn glyph(&self, ch: char) -> Option<Glyph>;
}

pub type SharedFont = Arc<dyn FontProgram>;

/// A trait for resolving font queries to font programs.
pub trait FontProvider: Send + Sync + Debug {
    fn resolve(&self, query: &FontQuery) -> Result<SharedFont, FontError>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A provider backed by fonts registered at runtime.
///
/// Lookup prefers an exact family/weight/style match, then the same family
/// with the closest weight (matching style first), and fails otherwise.
#[derive(Debug, Default)]
pub struct InMemoryFontProvider {
    fonts: RwLock<Vec<(FontQuery, SharedFont)>>,
}

impl InMemoryFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `FontError::Registry` if the internal lock is poisoned.
    pub fn register(&self, query: FontQuery, font: SharedFont) -> Result<(), FontError> {
        let mut fonts = self
            .fonts
            .write()
            .map_err(|_| FontError::Registry("font registry lock poisoned".to_string()))?;
        fonts.retain(|(existing, _)| existing != &query);
        log::debug!(
            "Registered font '{}' for {:?}",
            font.postscript_name(),
            query
        );
        fonts.push((query, font));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FontProvider for InMemoryFontProvider {
    fn resolve(&self, query: &FontQuery) -> Result<SharedFont, FontError> {
        let fonts = self
            .fonts
            .read()
            .map_err(|_| FontError::Registry("font registry lock poisoned".to_string()))?;

        if let Some((_, font)) = fonts
            .iter()
            .find(|(q, _)| q.matches_family(query) && q.weight == query.weight && q.style == query.style)
        {
            return Ok(font.clone());
        }

        let wanted = query.weight.numeric_value() as i32;
        fonts
            .iter()
            .filter(|(q, _)| q.matches_family(query))
            .min_by_key(|(q, _)| {
                let style_penalty = if q.style == query.style { 0 } else { 1000 };
                style_penalty + (q.weight.numeric_value() as i32 - wanted).abs()
            })
            .map(|(_, font)| font.clone())
            .ok_or_else(|| FontError::NotFound(query.family.clone()))
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
