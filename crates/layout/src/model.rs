//! The content model: what the document says, before any geometry exists.
//!
//! Model elements are shared between every renderer created for them,
//! including the split and overflow fragments produced during layout, so
//! they live behind `Rc<RefCell<_>>`.

use crate::properties::{Property, PropertyStore, PropertyValue};
use folio_style::{Border, Dimension};
use folio_types::{Color, ResourceUri};
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedElement = Rc<RefCell<ModelElement>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub uri: ResourceUri,
    /// Intrinsic size in points.
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Document,
    Div,
    Paragraph,
    Text(String),
    Image(ImageSource),
    Table { columns: usize },
    Cell,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Document => "document",
            ElementKind::Div => "div",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Table { .. } => "table",
            ElementKind::Cell => "cell",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelElement {
    pub kind: ElementKind,
    properties: PropertyStore,
    children: Vec<SharedElement>,
}

impl ModelElement {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            properties: PropertyStore::new(),
            children: Vec::new(),
        }
    }

    pub fn document() -> Self {
        Self::new(ElementKind::Document)
    }

    pub fn div() -> Self {
        Self::new(ElementKind::Div)
    }

    pub fn paragraph() -> Self {
        Self::new(ElementKind::Paragraph)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text(content.into()))
    }

    pub fn image(uri: impl Into<ResourceUri>, width: f32, height: f32) -> Self {
        Self::new(ElementKind::Image(ImageSource {
            uri: uri.into(),
            width,
            height,
        }))
    }

    pub fn table(columns: usize) -> Self {
        Self::new(ElementKind::Table {
            columns: columns.max(1),
        })
    }

    pub fn cell() -> Self {
        Self::new(ElementKind::Cell)
    }

    pub fn shared(self) -> SharedElement {
        Rc::new(RefCell::new(self))
    }

    pub fn with(mut self, key: Property, value: PropertyValue) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn with_child(mut self, child: SharedElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: SharedElement) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[SharedElement] {
        &self.children
    }

    pub fn property(&self, key: Property) -> Option<PropertyValue> {
        self.properties.get(key).cloned()
    }

    pub fn has_property(&self, key: Property) -> bool {
        self.properties.contains(key)
    }

    pub fn set_property(&mut self, key: Property, value: PropertyValue) {
        self.properties.set(key, value);
    }

    pub fn remove_property(&mut self, key: Property) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    /// Element-specific default, falling back to the global default.
    pub fn default_property(&self, key: Property) -> Option<PropertyValue> {
        let specific = match (&self.kind, key) {
            (
                ElementKind::Cell,
                Property::PaddingTop
                | Property::PaddingRight
                | Property::PaddingBottom
                | Property::PaddingLeft,
            ) => Some(PropertyValue::Length(Dimension::Pt(2.0))),
            (ElementKind::Cell, Property::Border) => {
                Some(PropertyValue::Border(Some(Border::solid(0.5, Color::BLACK))))
            }
            _ => None,
        };
        specific.or_else(|| key.default_value())
    }
}
