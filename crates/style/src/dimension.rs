//! Defines primitives for size, position, and spacing.
use crate::parsers::{parse_dimension, parse_shorthand_edges, run_parser};
use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};

/// A length that is either absolute, relative to a containing dimension, or
/// left for layout to decide.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Pt(f32),
    Percent(f32),
    #[default]
    Auto,
}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Dimension::Pt(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Percent(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Auto => {
                2u8.hash(state);
            }
        }
    }
}

impl Eq for Dimension {}

impl Dimension {
    /// Resolves against `base`; `Auto` stays unresolved.
    pub fn resolve(&self, base: f32) -> Option<f32> {
        match self {
            Dimension::Pt(v) => Some(*v),
            Dimension::Percent(p) => Some(base * p / 100.0),
            Dimension::Auto => None,
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DimensionDef {
            Num(f32),
            Str(String),
        }

        match DimensionDef::deserialize(deserializer)? {
            DimensionDef::Num(v) => Ok(Dimension::Pt(v)),
            DimensionDef::Str(s) => run_parser(parse_dimension, &s).map_err(de::Error::custom),
        }
    }
}

/// Four independent edge widths, used for margins, paddings and resolved
/// border widths.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Hash for Edges {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.top.to_bits().hash(state);
        self.right.to_bits().hash(state);
        self.bottom.to_bits().hash(state);
        self.left.to_bits().hash(state);
    }
}

impl Eq for Edges {}

impl Edges {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn x(value: f32) -> Self {
        Self::new(0.0, value, 0.0, value)
    }

    pub fn y(value: f32) -> Self {
        Self::new(value, 0.0, value, 0.0)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

impl<'de> Deserialize<'de> for Edges {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EdgesVisitor;
        impl<'de> de::Visitor<'de> for EdgesVisitor {
            type Value = Edges;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string like '10pt' or '10pt 20pt', a number, or a map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Edges, E>
            where
                E: de::Error,
            {
                parse_shorthand_edges(value).map_err(E::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Edges, E>
            where
                E: de::Error,
            {
                Ok(Edges::all(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Edges, E>
            where
                E: de::Error,
            {
                Ok(Edges::all(value as f32))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Edges, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut edges = Edges::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => edges.top = map.next_value()?,
                        "right" => edges.right = map.next_value()?,
                        "bottom" => edges.bottom = map.next_value()?,
                        "left" => edges.left = map.next_value()?,
                        _ => {
                            let _ignored: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(edges)
            }
        }
        deserializer.deserialize_any(EdgesVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// Parses a page size name (e.g., "A4", "Letter", "Legal").
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}
