use super::builder::PipelineBuilder;
use crate::document;
use crate::error::PipelineError;
use folio_layout::{DocumentRenderer, LayoutConfig, LayoutEnvironment, PageOutput, SharedElement};
use folio_traits::{FontProvider, Hyphenator, InMemoryDocument, RecordingCanvas};
use log::{debug, info};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Every page of a rendered document plus the destinations and
/// annotations collected while painting.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub pages: Vec<PageOutput<RecordingCanvas>>,
    pub document: InMemoryDocument,
}

impl RenderedDocument {
    pub fn page(&self, page_number: usize) -> Option<&RecordingCanvas> {
        self.pages
            .iter()
            .find(|p| p.page_number == page_number)
            .map(|p| &p.canvas)
    }

    /// Display list of every page, suitable for dumping or diffing.
    pub fn to_json(&self) -> Value {
        let pages: Vec<Value> = self
            .pages
            .iter()
            .map(|page| json!({ "page": page.page_number, "ops": page.canvas.ops() }))
            .collect();
        json!({ "pages": pages, "document": self.document })
    }
}

/// Lays out content trees and paints them into recording canvases.
///
/// A pipeline holds no per-document state, so one instance can render any
/// number of documents.
#[derive(Debug)]
pub struct Pipeline {
    config: LayoutConfig,
    fonts: Option<Arc<dyn FontProvider>>,
    hyphenator: Option<Arc<dyn Hyphenator>>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub(super) fn new(
        config: LayoutConfig,
        fonts: Option<Arc<dyn FontProvider>>,
        hyphenator: Option<Arc<dyn Hyphenator>>,
    ) -> Self {
        Self {
            config,
            fonts,
            hyphenator,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn render(&self, root: &SharedElement) -> Result<RenderedDocument, PipelineError> {
        let start = Instant::now();
        let mut env = LayoutEnvironment::new(&self.config);
        if let Some(fonts) = &self.fonts {
            env = env.with_fonts(fonts.as_ref());
        }
        if let Some(hyphenator) = &self.hyphenator {
            env = env.with_hyphenator(hyphenator.as_ref());
        }
        debug!("Rendering with {:?}", env);

        let mut renderer = DocumentRenderer::new(env, root);
        let mut document = InMemoryDocument::new();
        let pages = renderer.render::<RecordingCanvas>(&mut document)?;

        info!(
            "Rendered {} pages in {:.2?}",
            pages.len(),
            start.elapsed()
        );
        Ok(RenderedDocument { pages, document })
    }

    pub fn render_json(&self, json: &str) -> Result<RenderedDocument, PipelineError> {
        self.render(&document::from_str(json)?)
    }

    pub fn render_value(&self, value: Value) -> Result<RenderedDocument, PipelineError> {
        self.render(&document::from_value(value)?)
    }

    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> Result<RenderedDocument, PipelineError> {
        let source = fs::read_to_string(path.as_ref())?;
        self.render_json(&source)
    }
}
