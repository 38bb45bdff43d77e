//! Closed set of layout properties and the per-node store holding them.
//!
//! Values are resolved through the render tree (see
//! [`RenderTree::property`](crate::tree::RenderTree::property)): own store,
//! then the model element's store, then the parent for inherited keys, then
//! renderer and model defaults.

use folio_style::{
    Background, BackgroundImage, BaseDirection, Border, BorderRadius, BoxSizing, Dimension, Float,
    FontStyle, FontWeight, Overflow, Position, TextAlign, TextDecoration,
};
use folio_traits::{Hyphenator, SharedFont};
use folio_types::{AffineTransform, AnchorId, Color};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    // Text
    /// Either a resolved font or a family name to resolve through the provider.
    Font,
    FontSize,
    FontWeight,
    FontStyle,
    FontColor,
    TextRise,
    TextAlign,
    TextDecoration,
    BaseDirection,
    /// Multiplier applied to the natural line height of a paragraph line.
    LineHeight,
    Hyphenation,
    ItalicSimulation,
    BoldSimulation,

    // Sizing
    Width,
    Height,
    MinWidth,
    MaxWidth,
    MinHeight,
    MaxHeight,
    BoxSizing,

    // Box model
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    /// Fallback for edges whose own border property is unset.
    Border,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    BorderRadius,

    // Paint
    Background,
    BackgroundImage,
    Opacity,
    Transform,
    Outline,
    OutlineOffset,

    // Positioning
    Position,
    Top,
    Right,
    Bottom,
    Left,
    Float,
    Overflow,
    /// Suppresses the `Nothing` result when content does not fit.
    ForcedPlacement,

    // Document side effects
    Destination,
    Action,
    Link,
    /// Structure tag wrapped around the node's content on the canvas.
    Role,
}

impl Property {
    pub fn is_inherited(self) -> bool {
        matches!(
            self,
            Property::Font
                | Property::FontSize
                | Property::FontWeight
                | Property::FontStyle
                | Property::FontColor
                | Property::TextRise
                | Property::TextAlign
                | Property::TextDecoration
                | Property::BaseDirection
                | Property::LineHeight
                | Property::Hyphenation
                | Property::ItalicSimulation
                | Property::BoldSimulation
        )
    }

    /// Built-in value used when nothing in the resolution chain declares one.
    pub fn default_value(self) -> Option<PropertyValue> {
        let value = match self {
            Property::FontWeight => PropertyValue::FontWeight(FontWeight::Regular),
            Property::FontStyle => PropertyValue::FontStyle(FontStyle::Normal),
            Property::FontColor => PropertyValue::Color(Color::BLACK),
            Property::TextRise => PropertyValue::Number(0.0),
            Property::TextDecoration => PropertyValue::Decoration(TextDecoration::None),
            Property::LineHeight => PropertyValue::Number(1.0),
            Property::ItalicSimulation | Property::BoldSimulation | Property::ForcedPlacement => {
                PropertyValue::Bool(false)
            }
            Property::MarginTop
            | Property::MarginRight
            | Property::MarginBottom
            | Property::MarginLeft
            | Property::PaddingTop
            | Property::PaddingRight
            | Property::PaddingBottom
            | Property::PaddingLeft => PropertyValue::Length(Dimension::Pt(0.0)),
            Property::BoxSizing => PropertyValue::BoxSizing(BoxSizing::ContentBox),
            Property::Opacity => PropertyValue::Number(1.0),
            Property::OutlineOffset => PropertyValue::Number(0.0),
            Property::Position => PropertyValue::Position(Position::Static),
            Property::Float => PropertyValue::FloatMode(Float::None),
            Property::Overflow => PropertyValue::Overflow(Overflow::Fit),
            _ => return None,
        };
        Some(value)
    }
}

/// A property value. Variants carry the style vocabulary directly.
#[derive(Clone)]
pub enum PropertyValue {
    Number(f32),
    Integer(i32),
    Bool(bool),
    Text(String),
    Color(Color),
    Length(Dimension),
    /// `None` declares an explicit absence of border on that edge.
    Border(Option<Border>),
    Radius(BorderRadius),
    Background(Background),
    BackgroundImage(BackgroundImage),
    Position(Position),
    FloatMode(Float),
    BoxSizing(BoxSizing),
    Overflow(Overflow),
    TextAlign(TextAlign),
    Decoration(TextDecoration),
    Direction(BaseDirection),
    FontWeight(FontWeight),
    FontStyle(FontStyle),
    Font(SharedFont),
    Hyphenator(Arc<dyn Hyphenator>),
    Transform(AffineTransform),
    Anchor(AnchorId),
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(v) => write!(f, "Number({v})"),
            PropertyValue::Integer(v) => write!(f, "Integer({v})"),
            PropertyValue::Bool(v) => write!(f, "Bool({v})"),
            PropertyValue::Text(v) => write!(f, "Text({v:?})"),
            PropertyValue::Color(v) => write!(f, "Color({v:?})"),
            PropertyValue::Length(v) => write!(f, "Length({v:?})"),
            PropertyValue::Border(v) => write!(f, "Border({v:?})"),
            PropertyValue::Radius(v) => write!(f, "Radius({v:?})"),
            PropertyValue::Background(v) => write!(f, "Background({v:?})"),
            PropertyValue::BackgroundImage(v) => write!(f, "BackgroundImage({v:?})"),
            PropertyValue::Position(v) => write!(f, "Position({v:?})"),
            PropertyValue::FloatMode(v) => write!(f, "FloatMode({v:?})"),
            PropertyValue::BoxSizing(v) => write!(f, "BoxSizing({v:?})"),
            PropertyValue::Overflow(v) => write!(f, "Overflow({v:?})"),
            PropertyValue::TextAlign(v) => write!(f, "TextAlign({v:?})"),
            PropertyValue::Decoration(v) => write!(f, "Decoration({v:?})"),
            PropertyValue::Direction(v) => write!(f, "Direction({v:?})"),
            PropertyValue::FontWeight(v) => write!(f, "FontWeight({v:?})"),
            PropertyValue::FontStyle(v) => write!(f, "FontStyle({v:?})"),
            PropertyValue::Font(font) => write!(f, "Font({})", font.postscript_name()),
            PropertyValue::Hyphenator(h) => write!(f, "Hyphenator({h:?})"),
            PropertyValue::Transform(v) => write!(f, "Transform({v:?})"),
            PropertyValue::Anchor(v) => write!(f, "Anchor({})", v.as_str()),
        }
    }
}

impl PropertyValue {
    /// Numeric coercion: numbers, integers and point lengths.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Integer(v) => Some(*v as f32),
            PropertyValue::Length(Dimension::Pt(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            PropertyValue::Number(v) if v.fract() == 0.0 => Some(*v as i32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropertyValue::Color(c) => Some(*c),
            PropertyValue::Background(bg) => Some(bg.color),
            _ => None,
        }
    }
}

/// Conversion out of a [`PropertyValue`]; `None` on a type mismatch.
pub trait FromProperty: Sized {
    fn from_property(value: &PropertyValue) -> Option<Self>;
}

macro_rules! from_property {
    ($ty:ty, $variant:ident) => {
        impl FromProperty for $ty {
            fn from_property(value: &PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

from_property!(String, Text);
from_property!(Option<Border>, Border);
from_property!(BorderRadius, Radius);
from_property!(Background, Background);
from_property!(BackgroundImage, BackgroundImage);
from_property!(Position, Position);
from_property!(Float, FloatMode);
from_property!(BoxSizing, BoxSizing);
from_property!(Overflow, Overflow);
from_property!(TextAlign, TextAlign);
from_property!(TextDecoration, Decoration);
from_property!(BaseDirection, Direction);
from_property!(FontWeight, FontWeight);
from_property!(FontStyle, FontStyle);
from_property!(SharedFont, Font);
from_property!(Arc<dyn Hyphenator>, Hyphenator);
from_property!(AffineTransform, Transform);
from_property!(AnchorId, Anchor);

impl FromProperty for f32 {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromProperty for i32 {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_int()
    }
}

impl FromProperty for bool {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromProperty for Color {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_color()
    }
}

impl FromProperty for Dimension {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Length(d) => Some(*d),
            PropertyValue::Number(v) => Some(Dimension::Pt(*v)),
            _ => None,
        }
    }
}

/// Key/value bag local to one renderer or model element.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    values: HashMap<Property, PropertyValue>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: Property) -> Option<&PropertyValue> {
        self.values.get(&key)
    }

    pub fn set(&mut self, key: Property, value: PropertyValue) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: Property) -> Option<PropertyValue> {
        self.values.remove(&key)
    }

    pub fn contains(&self, key: Property) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Property, &PropertyValue)> {
        self.values.iter()
    }
}

impl FromIterator<(Property, PropertyValue)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (Property, PropertyValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(PropertyValue::Integer(3).as_float(), Some(3.0));
        assert_eq!(PropertyValue::Length(Dimension::Pt(4.5)).as_float(), Some(4.5));
        assert_eq!(PropertyValue::Length(Dimension::Percent(50.0)).as_float(), None);
        assert_eq!(PropertyValue::Number(2.0).as_int(), Some(2));
        assert_eq!(PropertyValue::Number(2.5).as_int(), None);
        assert_eq!(PropertyValue::Text("x".into()).as_bool(), None);
    }

    #[test]
    fn test_typed_conversion_rejects_mismatch() {
        let value = PropertyValue::Position(Position::Fixed);
        assert_eq!(Position::from_property(&value), Some(Position::Fixed));
        assert_eq!(TextAlign::from_property(&value), None);
    }

    #[test]
    fn test_inherited_keys() {
        assert!(Property::FontSize.is_inherited());
        assert!(Property::TextAlign.is_inherited());
        assert!(!Property::Width.is_inherited());
        assert!(!Property::Background.is_inherited());
    }

    #[test]
    fn test_store_mutation() {
        let mut store = PropertyStore::new();
        store.set(Property::Opacity, PropertyValue::Number(0.5));
        assert!(store.contains(Property::Opacity));
        assert!(store.remove(Property::Opacity).is_some());
        assert!(store.is_empty());
    }
}
