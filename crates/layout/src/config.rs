use folio_style::{Edges, PageSize};
use serde::Deserialize;

/// Document-wide layout settings. Every field has a default, so a
/// configuration file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_size: PageSize,

    /// Page margins in points. Root flow content is laid out inside them;
    /// fixed-position content is placed relative to the full page.
    pub margins: Edges,

    /// Family used when no element declares a font.
    pub default_font_family: String,

    pub default_font_size: f32,

    /// Upper bound on the number of pages a single document may produce.
    ///
    /// Pagination forces content onto an empty page when it does not fit
    /// anywhere, so it always terminates; this guard only catches runaway
    /// documents. Defaults to `10000`.
    pub max_pages: usize,

    /// Paint each page as soon as it is filled instead of after the whole
    /// document has been laid out.
    pub immediate_flush: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Edges::all(36.0),
            default_font_family: "Helvetica".to_string(),
            default_font_size: 12.0,
            max_pages: 10000,
            immediate_flush: true,
        }
    }
}

impl LayoutConfig {
    pub fn page_dimensions(&self) -> (f32, f32) {
        self.page_size.dimensions_pt()
    }
}
