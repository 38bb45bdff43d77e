use crate::config::LayoutConfig;
use crate::interface::{LayoutArea, LayoutContext};
use crate::model::{ModelElement, SharedElement};
use crate::properties::{Property, PropertyValue};
use folio_traits::{
    DictionaryHyphenator, FontMetrics, FontProgram, FontQuery, Glyph, InMemoryFontProvider,
    SharedFont,
};
use folio_types::Rect;
use std::sync::Arc;

/// Every glyph is half an em wide, so at 10pt each character takes 5pt.
///
/// The Windows metrics are zero, so line metrics come from the typographic
/// values scaled by 1.2: ascent 9.6 and descent -2.4 at 10pt.
#[derive(Debug, Default)]
pub struct MonospaceFont;

impl FontProgram for MonospaceFont {
    fn postscript_name(&self) -> &str {
        "Mono"
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            typo_ascender: 800.0,
            typo_descender: -200.0,
            win_ascender: 0.0,
            win_descender: 0.0,
            underline_position: -100.0,
            underline_thickness: 50.0,
        }
    }

    fn shape(&self, text: &str) -> Vec<Glyph> {
        text.chars().map(|c| Glyph::new(c as u16, 500.0, Some(c))).collect()
    }

    fn glyph(&self, ch: char) -> Option<Glyph> {
        Some(Glyph::new(ch as u16, 500.0, Some(ch)))
    }
}

pub fn mono() -> SharedFont {
    Arc::new(MonospaceFont)
}

/// A provider answering both the test family and the configured default.
pub fn font_provider() -> InMemoryFontProvider {
    let provider = InMemoryFontProvider::new();
    for family in ["Mono", &LayoutConfig::default().default_font_family] {
        provider
            .register(FontQuery::regular(family), mono())
            .expect("fresh registry");
    }
    provider
}

pub fn hyphenator() -> DictionaryHyphenator {
    DictionaryHyphenator::new().with_words(["hy-phen-ation"])
}

/// A text element in the monospace font at 10pt.
pub fn mono_text(content: &str) -> ModelElement {
    ModelElement::text(content)
        .with(Property::Font, PropertyValue::Font(mono()))
        .with(Property::FontSize, PropertyValue::Number(10.0))
}

/// A paragraph holding one monospace text run per entry.
pub fn paragraph(runs: &[&str]) -> SharedElement {
    runs.iter()
        .fold(ModelElement::paragraph(), |p, run| p.with_child(mono_text(run).shared()))
        .shared()
}

/// A context on page 1 whose area has its top edge at `height`.
pub fn context(width: f32, height: f32) -> LayoutContext {
    LayoutContext::new(LayoutArea::new(1, Rect::new(0.0, 0.0, width, height)))
}
