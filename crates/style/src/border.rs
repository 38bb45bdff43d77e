use crate::dimension::Dimension;
use crate::parsers::{parse_border, run_parser};
use folio_types::Color;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    None,
}

impl BorderStyle {
    /// Dash array (on, off) for the given stroke width, `None` for continuous strokes.
    pub fn dash_pattern(&self, width: f32) -> Option<[f32; 2]> {
        match self {
            BorderStyle::Dashed => Some([3.0 * width, 3.0 * width]),
            BorderStyle::Dotted => Some([width, width]),
            _ => None,
        }
    }
}

/// One edge of a border (or an outline).
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Border {
    pub width: f32,
    pub style: BorderStyle,
    pub color: Color,
}

impl Eq for Border {}

impl Hash for Border {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.to_bits().hash(state);
        self.style.hash(state);
        self.color.hash(state);
    }
}

impl Border {
    pub fn solid(width: f32, color: Color) -> Self {
        Self {
            width,
            style: BorderStyle::Solid,
            color,
        }
    }

    /// Width that actually takes space: `none` borders contribute nothing.
    pub fn effective_width(&self) -> f32 {
        if self.style == BorderStyle::None {
            0.0
        } else {
            self.width.max(0.0)
        }
    }
}

impl<'de> Deserialize<'de> for Border {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        run_parser(parse_border, &s).map_err(de::Error::custom)
    }
}

/// Outlines share the border shape; they are drawn outside the margin box
/// and never take space in layout.
pub type Outline = Border;

/// A uniform corner radius applied to all four corners.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct BorderRadius(pub Dimension);

impl BorderRadius {
    pub fn pt(value: f32) -> Self {
        Self(Dimension::Pt(value))
    }
}
