//! Document-level side effects of painting: destinations and annotations.

use folio_types::{AnchorId, Rect};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Annotation {
    /// Internal link to a named destination.
    Link { rect: Rect, target: AnchorId },
    /// External action, typically a URI.
    Action { rect: Rect, uri: String },
}

impl Annotation {
    pub fn rect(&self) -> Rect {
        match self {
            Annotation::Link { rect, .. } | Annotation::Action { rect, .. } => *rect,
        }
    }
}

pub trait DocumentSink {
    fn page_count(&self) -> usize;

    /// Makes sure page `page_number` (1-based) exists.
    fn ensure_page(&mut self, page_number: usize);

    fn add_named_destination(&mut self, name: &AnchorId, page_number: usize, y: f32);

    fn add_annotation(&mut self, page_number: usize, annotation: Annotation);
}

/// Keeps destinations and annotations in memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InMemoryDocument {
    pub pages: usize,
    pub destinations: HashMap<AnchorId, (usize, f32)>,
    pub annotations: Vec<(usize, Annotation)>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotations_on(&self, page_number: usize) -> impl Iterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(move |(page, _)| *page == page_number)
            .map(|(_, annotation)| annotation)
    }
}

impl DocumentSink for InMemoryDocument {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn ensure_page(&mut self, page_number: usize) {
        self.pages = self.pages.max(page_number);
    }

    fn add_named_destination(&mut self, name: &AnchorId, page_number: usize, y: f32) {
        self.ensure_page(page_number);
        self.destinations.insert(name.clone(), (page_number, y));
    }

    fn add_annotation(&mut self, page_number: usize, annotation: Annotation) {
        self.ensure_page(page_number);
        self.annotations.push((page_number, annotation));
    }
}
