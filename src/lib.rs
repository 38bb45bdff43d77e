//! Paginated document layout.
//!
//! Content trees are loaded from JSON ([`document`]), laid out page by page
//! with `folio-layout`, and painted into recording canvases ([`Pipeline`]).

pub mod document;
pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineBuilder, RenderedDocument};

pub use folio_layout::{LayoutConfig, ModelElement, Property, PropertyValue, SharedElement};
