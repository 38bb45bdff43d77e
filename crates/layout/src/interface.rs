use crate::config::LayoutConfig;
use crate::tree::NodeId;
use folio_traits::{FontProvider, Hyphenator};
use folio_types::Rect;
use std::fmt::Debug;

// --- Areas ---

/// A rectangle on a specific page. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutArea {
    pub page_number: usize,
    pub rect: Rect,
}

impl LayoutArea {
    pub fn new(page_number: usize, rect: Rect) -> Self {
        Self { page_number, rect }
    }
}

/// The area a parent offers to a child.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext {
    pub area: LayoutArea,
    /// Whether the line or block the child is placed into already holds
    /// content. Text uses it to avoid force-splitting words mid-line.
    pub line_has_content: bool,
    /// Place the content even if it does not fit, clipping if needed.
    pub force_placement: bool,
}

impl LayoutContext {
    pub fn new(area: LayoutArea) -> Self {
        Self {
            area,
            line_has_content: false,
            force_placement: false,
        }
    }

    pub fn forced(mut self, force: bool) -> Self {
        self.force_placement = force;
        self
    }

    pub fn with_line_content(mut self, line_has_content: bool) -> Self {
        self.line_has_content = line_has_content;
        self
    }
}

// --- Results ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    /// Everything fit.
    Full,
    /// Part fit; `split` holds it and `overflow` holds the rest.
    Partial,
    /// Nothing fit; `overflow` is the node itself and must be retried in a
    /// fresh area.
    Nothing,
}

#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub status: LayoutStatus,
    pub occupied: Option<LayoutArea>,
    pub split: Option<NodeId>,
    pub overflow: Option<NodeId>,
    /// The descendant that could not be placed.
    pub cause: Option<NodeId>,
    /// A word was cut at the first overflowing glyph to make progress.
    pub word_split: bool,
    /// The break was forced by a newline glyph.
    pub forced_newline: bool,
}

impl LayoutResult {
    pub fn full(occupied: LayoutArea) -> Self {
        Self {
            status: LayoutStatus::Full,
            occupied: Some(occupied),
            split: None,
            overflow: None,
            cause: None,
            word_split: false,
            forced_newline: false,
        }
    }

    pub fn partial(occupied: LayoutArea, split: NodeId, overflow: NodeId) -> Self {
        Self {
            status: LayoutStatus::Partial,
            occupied: Some(occupied),
            split: Some(split),
            overflow: Some(overflow),
            cause: None,
            word_split: false,
            forced_newline: false,
        }
    }

    pub fn nothing(node: NodeId, cause: NodeId) -> Self {
        Self {
            status: LayoutStatus::Nothing,
            occupied: None,
            split: None,
            overflow: Some(node),
            cause: Some(cause),
            word_split: false,
            forced_newline: false,
        }
    }

    pub fn with_cause(mut self, cause: NodeId) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn is_full(&self) -> bool {
        self.status == LayoutStatus::Full
    }

    pub fn is_nothing(&self) -> bool {
        self.status == LayoutStatus::Nothing
    }
}

// --- Environment ---

/// Read-only collaborators shared across the layout pass.
#[derive(Clone, Copy)]
pub struct LayoutEnvironment<'a> {
    pub fonts: Option<&'a dyn FontProvider>,
    /// Used for elements that enable hyphenation without naming their own.
    pub hyphenator: Option<&'a dyn Hyphenator>,
    pub config: &'a LayoutConfig,
}

impl<'a> LayoutEnvironment<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            fonts: None,
            hyphenator: None,
            config,
        }
    }

    pub fn with_fonts(mut self, fonts: &'a dyn FontProvider) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn with_hyphenator(mut self, hyphenator: &'a dyn Hyphenator) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }
}

impl Debug for LayoutEnvironment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEnvironment")
            .field("fonts", &self.fonts.map(|p| p.name()))
            .field("hyphenator", &self.hyphenator.is_some())
            .field("config", self.config)
            .finish()
    }
}
