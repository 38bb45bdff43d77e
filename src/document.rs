//! JSON content trees.
//!
//! A content tree is a nested object of the form
//!
//! ```json
//! { "type": "paragraph", "style": { "text-align": "justify" },
//!   "children": [ { "type": "text", "text": "Hello" } ] }
//! ```
//!
//! Style values are written the way a stylesheet would write them and are
//! parsed one property at a time; there is no cascade.

use crate::error::PipelineError;
use folio_layout::{ModelElement, Property, PropertyValue, SharedElement};
use folio_style::parsers::{
    parse_bool, parse_border_radius, parse_box_sizing, parse_color, parse_dimension,
    parse_direction, parse_float, parse_font_style, parse_font_weight, parse_length,
    parse_optional_border, parse_overflow, parse_position, parse_shorthand_edges,
    parse_text_align, parse_text_decoration, parse_transform, run_parser,
};
use folio_style::{Background, BackgroundImage, BackgroundRepeat, Dimension, StyleParseError};
use folio_types::AnchorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Document,
    Div,
    Paragraph,
    Text,
    Image,
    Table,
    Cell,
}

/// A style value as written in JSON. Numbers are read as points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Number(f32),
    Text(String),
}

impl StyleValue {
    fn as_text(&self) -> String {
        match self {
            StyleValue::Bool(b) => b.to_string(),
            StyleValue::Number(n) => n.to_string(),
            StyleValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentNode {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

/// Parses a content tree. A root that is not a document is wrapped in one.
pub fn from_str(json: &str) -> Result<SharedElement, PipelineError> {
    let node: ContentNode = serde_json::from_str(json)?;
    node.into_document()
}

pub fn from_value(value: serde_json::Value) -> Result<SharedElement, PipelineError> {
    let node: ContentNode = serde_json::from_value(value)?;
    node.into_document()
}

impl ContentNode {
    pub fn into_document(self) -> Result<SharedElement, PipelineError> {
        if self.kind == ContentKind::Document {
            return self.to_element();
        }
        let root = ModelElement::document().with_child(self.to_element()?);
        Ok(root.shared())
    }

    /// Converts this node and its children into model elements.
    pub fn to_element(&self) -> Result<SharedElement, PipelineError> {
        let mut element = match self.kind {
            ContentKind::Document => ModelElement::document(),
            ContentKind::Div => ModelElement::div(),
            ContentKind::Paragraph => ModelElement::paragraph(),
            ContentKind::Cell => ModelElement::cell(),
            ContentKind::Table => ModelElement::table(self.columns.unwrap_or(1)),
            ContentKind::Text => {
                if !self.children.is_empty() {
                    return Err(PipelineError::Content(
                        "text nodes cannot have children".to_string(),
                    ));
                }
                ModelElement::text(self.text.clone().unwrap_or_default())
            }
            ContentKind::Image => {
                let (Some(src), Some(width), Some(height)) = (&self.src, self.width, self.height)
                else {
                    return Err(PipelineError::Content(
                        "image nodes need 'src', 'width' and 'height'".to_string(),
                    ));
                };
                ModelElement::image(src.as_str(), width, height)
            }
        };

        for (key, value) in &self.style {
            apply_style(&mut element, key, value).map_err(|source| PipelineError::Style {
                key: key.clone(),
                source,
            })?;
        }
        for child in &self.children {
            element.push_child(child.to_element()?);
        }
        Ok(element.shared())
    }
}

fn length(value: &StyleValue) -> Result<Dimension, StyleParseError> {
    run_parser(parse_dimension, &value.as_text())
}

fn number(value: &StyleValue) -> Result<f32, StyleParseError> {
    match value {
        StyleValue::Number(n) => Ok(*n),
        other => run_parser(parse_length, &other.as_text()),
    }
}

fn flag(key: &str, value: &StyleValue) -> Result<bool, StyleParseError> {
    match value {
        StyleValue::Bool(b) => Ok(*b),
        other => parse_bool(key, &other.as_text()),
    }
}

const MARGINS: [Property; 4] = [
    Property::MarginTop,
    Property::MarginRight,
    Property::MarginBottom,
    Property::MarginLeft,
];

const PADDINGS: [Property; 4] = [
    Property::PaddingTop,
    Property::PaddingRight,
    Property::PaddingBottom,
    Property::PaddingLeft,
];

fn set_edges(element: &mut ModelElement, keys: [Property; 4], value: &StyleValue) -> Result<(), StyleParseError> {
    let edges = parse_shorthand_edges(&value.as_text())?;
    for (key, width) in keys.into_iter().zip([edges.top, edges.right, edges.bottom, edges.left]) {
        element.set_property(key, PropertyValue::Length(Dimension::Pt(width)));
    }
    Ok(())
}

/// `"<src> <width> <height> [repeat|repeat-x|repeat-y|no-repeat]"`.
fn background_image(value: &StyleValue) -> Result<BackgroundImage, StyleParseError> {
    let text = value.as_text();
    let parts: Vec<&str> = text.split_whitespace().collect();
    let (source, width, height, repeat) = match parts.as_slice() {
        [source, width, height] => (source, width, height, "repeat"),
        [source, width, height, repeat] => (source, width, height, *repeat),
        _ => {
            return Err(StyleParseError::InvalidValue {
                property: "background-image".to_string(),
                value: text.clone(),
            });
        }
    };
    let repeat = match repeat {
        "repeat" => BackgroundRepeat::both(),
        "repeat-x" => BackgroundRepeat { x: true, y: false },
        "repeat-y" => BackgroundRepeat { x: false, y: true },
        "no-repeat" => BackgroundRepeat::none(),
        other => {
            return Err(StyleParseError::InvalidValue {
                property: "background-repeat".to_string(),
                value: other.to_string(),
            });
        }
    };
    Ok(BackgroundImage {
        source: (*source).into(),
        width: run_parser(parse_length, width)?,
        height: run_parser(parse_length, height)?,
        repeat,
    })
}

/// Sets the property named by a stylesheet-style `key`. Unknown keys are
/// logged and ignored.
pub fn apply_style(element: &mut ModelElement, key: &str, value: &StyleValue) -> Result<(), StyleParseError> {
    let text = value.as_text();
    let (property, parsed) = match key {
        "font-family" => (Property::Font, PropertyValue::Text(text)),
        "font-size" => (Property::FontSize, PropertyValue::Number(number(value)?)),
        "font-weight" => (Property::FontWeight, PropertyValue::FontWeight(parse_font_weight(&text)?)),
        "font-style" => (Property::FontStyle, PropertyValue::FontStyle(parse_font_style(&text)?)),
        "color" => (Property::FontColor, PropertyValue::Color(run_parser(parse_color, &text)?)),
        "text-rise" => (Property::TextRise, PropertyValue::Number(number(value)?)),
        "text-align" => (Property::TextAlign, PropertyValue::TextAlign(parse_text_align(&text)?)),
        "text-decoration" => (
            Property::TextDecoration,
            PropertyValue::Decoration(parse_text_decoration(&text)?),
        ),
        "direction" => (Property::BaseDirection, PropertyValue::Direction(parse_direction(&text)?)),
        "line-height" => (Property::LineHeight, PropertyValue::Number(number(value)?)),
        "hyphenate" => (Property::Hyphenation, PropertyValue::Bool(flag(key, value)?)),
        "italic-simulation" => (Property::ItalicSimulation, PropertyValue::Bool(flag(key, value)?)),
        "bold-simulation" => (Property::BoldSimulation, PropertyValue::Bool(flag(key, value)?)),

        "width" => (Property::Width, PropertyValue::Length(length(value)?)),
        "height" => (Property::Height, PropertyValue::Length(length(value)?)),
        "min-width" => (Property::MinWidth, PropertyValue::Length(length(value)?)),
        "max-width" => (Property::MaxWidth, PropertyValue::Length(length(value)?)),
        "min-height" => (Property::MinHeight, PropertyValue::Length(length(value)?)),
        "max-height" => (Property::MaxHeight, PropertyValue::Length(length(value)?)),
        "box-sizing" => (Property::BoxSizing, PropertyValue::BoxSizing(parse_box_sizing(&text)?)),

        "margin" => return set_edges(element, MARGINS, value),
        "padding" => return set_edges(element, PADDINGS, value),
        "margin-top" => (Property::MarginTop, PropertyValue::Length(length(value)?)),
        "margin-right" => (Property::MarginRight, PropertyValue::Length(length(value)?)),
        "margin-bottom" => (Property::MarginBottom, PropertyValue::Length(length(value)?)),
        "margin-left" => (Property::MarginLeft, PropertyValue::Length(length(value)?)),
        "padding-top" => (Property::PaddingTop, PropertyValue::Length(length(value)?)),
        "padding-right" => (Property::PaddingRight, PropertyValue::Length(length(value)?)),
        "padding-bottom" => (Property::PaddingBottom, PropertyValue::Length(length(value)?)),
        "padding-left" => (Property::PaddingLeft, PropertyValue::Length(length(value)?)),

        "border" => (Property::Border, PropertyValue::Border(run_parser(parse_optional_border, &text)?)),
        "border-top" => (Property::BorderTop, PropertyValue::Border(run_parser(parse_optional_border, &text)?)),
        "border-right" => (Property::BorderRight, PropertyValue::Border(run_parser(parse_optional_border, &text)?)),
        "border-bottom" => (Property::BorderBottom, PropertyValue::Border(run_parser(parse_optional_border, &text)?)),
        "border-left" => (Property::BorderLeft, PropertyValue::Border(run_parser(parse_optional_border, &text)?)),
        "border-radius" => (Property::BorderRadius, PropertyValue::Radius(run_parser(parse_border_radius, &text)?)),

        "background-color" => (
            Property::Background,
            PropertyValue::Background(Background::new(run_parser(parse_color, &text)?)),
        ),
        "background-image" => (Property::BackgroundImage, PropertyValue::BackgroundImage(background_image(value)?)),
        "opacity" => (Property::Opacity, PropertyValue::Number(number(value)?)),
        "transform" => (Property::Transform, PropertyValue::Transform(run_parser(parse_transform, &text)?)),
        "outline" => (Property::Outline, PropertyValue::Border(run_parser(parse_optional_border, &text)?)),
        "outline-offset" => (Property::OutlineOffset, PropertyValue::Number(number(value)?)),

        "position" => (Property::Position, PropertyValue::Position(parse_position(&text)?)),
        "top" => (Property::Top, PropertyValue::Length(length(value)?)),
        "right" => (Property::Right, PropertyValue::Length(length(value)?)),
        "bottom" => (Property::Bottom, PropertyValue::Length(length(value)?)),
        "left" => (Property::Left, PropertyValue::Length(length(value)?)),
        "float" => (Property::Float, PropertyValue::FloatMode(parse_float(&text)?)),
        "overflow" => (Property::Overflow, PropertyValue::Overflow(parse_overflow(&text)?)),
        "forced-placement" => (Property::ForcedPlacement, PropertyValue::Bool(flag(key, value)?)),

        "id" => (Property::Destination, PropertyValue::Anchor(AnchorId::new(text))),
        "link" => (Property::Link, PropertyValue::Anchor(AnchorId::new(text))),
        "href" => (Property::Action, PropertyValue::Text(text)),
        "role" => (Property::Role, PropertyValue::Text(text)),

        other => {
            log::warn!("Ignoring unknown style property '{}'", other);
            return Ok(());
        }
    };
    element.set_property(property, parsed);
    Ok(())
}
