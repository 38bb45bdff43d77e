use folio_types::{Color, ResourceUri};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Background {
    pub color: Color,
    #[serde(default = "full_opacity")]
    pub opacity: f32,
}

fn full_opacity() -> f32 {
    1.0
}

impl Background {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct BackgroundRepeat {
    pub x: bool,
    pub y: bool,
}

impl BackgroundRepeat {
    pub fn both() -> Self {
        Self { x: true, y: true }
    }

    pub fn none() -> Self {
        Self { x: false, y: false }
    }
}

/// An image tiled over the background area, starting at the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundImage {
    pub source: ResourceUri,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub repeat: BackgroundRepeat,
}
