use super::orchestrator::Pipeline;
use crate::error::PipelineError;
use folio_layout::{LayoutConfig, ShapedFont};
use folio_style::{FontStyle, FontWeight};
use folio_traits::{FontProvider, FontQuery, Hyphenator, InMemoryFontProvider, SharedFont};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A builder for creating a [`Pipeline`].
///
/// Fonts registered with [`with_font`](Self::with_font) or
/// [`with_font_file`](Self::with_font_file) go into an in-memory registry.
/// A provider passed to [`with_font_provider`](Self::with_font_provider)
/// replaces that registry.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: LayoutConfig,
    registry: InMemoryFontProvider,
    provider: Option<Arc<dyn FontProvider>>,
    hyphenator: Option<Arc<dyn Hyphenator>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_font_provider(mut self, provider: Arc<dyn FontProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Registers `font` for one family/weight/style combination.
    pub fn with_font(
        self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        font: SharedFont,
    ) -> Result<Self, PipelineError> {
        self.registry
            .register(FontQuery::new(family, weight, style), font)?;
        Ok(self)
    }

    /// Loads a TrueType/OpenType file and registers it as the regular face
    /// of `family`.
    pub fn with_font_file<P: AsRef<Path>>(self, family: &str, path: P) -> Result<Self, PipelineError> {
        let path_ref = path.as_ref();
        let data = fs::read(path_ref).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read font from '{}': {}", path_ref.display(), e),
            ))
        })?;
        let font = ShapedFont::from_bytes(path_ref.display().to_string(), data)?;
        log::info!("Loaded font '{}' for family '{}'", path_ref.display(), family);
        self.with_font(family, FontWeight::Regular, FontStyle::Normal, Arc::new(font))
    }

    /// Default hyphenator for elements that enable hyphenation without
    /// naming their own.
    pub fn with_hyphenator(mut self, hyphenator: Arc<dyn Hyphenator>) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    pub fn build(self) -> Pipeline {
        let fonts = match self.provider {
            Some(provider) => {
                if !self.registry.is_empty() {
                    log::warn!(
                        "Ignoring {} registered fonts in favour of the '{}' font provider",
                        self.registry.len(),
                        provider.name()
                    );
                }
                Some(provider)
            }
            None if self.registry.is_empty() => None,
            None => Some(Arc::new(self.registry) as Arc<dyn FontProvider>),
        };
        Pipeline::new(self.config, fonts, self.hyphenator)
    }
}
