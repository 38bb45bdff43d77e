use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    /// The `Font` property could not be turned into a font program.
    #[error("Font resolution failed: {0}")]
    FontResolution(String),
    #[error("A font family was named but no font provider is registered.")]
    MissingFontProvider,
    #[error("Node has no occupied area: {0}")]
    UninitializedArea(String),
    #[error("Invalid renderer tree: {0}")]
    InvalidTree(String),
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod box_model;
pub mod config;
pub mod engine;
pub mod interface;
pub mod model;
pub mod nodes;
pub mod painting;
pub mod positioning;
pub mod properties;
pub mod text;
pub mod tree;

pub use self::config::LayoutConfig;
pub use self::engine::{DocumentRenderer, PageOutput};
pub use self::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutResult, LayoutStatus};
pub use self::model::{ElementKind, ModelElement, SharedElement};
pub use self::properties::{Property, PropertyValue};
pub use self::text::ShapedFont;
pub use self::tree::{NodeId, NodeKind, RenderTree};

#[cfg(test)]
mod test_utils;
