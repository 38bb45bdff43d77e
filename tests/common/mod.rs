#![allow(dead_code)]

use folio::{LayoutConfig, Pipeline, PipelineError, RenderedDocument};
use folio_style::{Edges, FontStyle, FontWeight, PageSize};
use folio_traits::{CanvasOp, FontMetrics, FontProgram, Glyph, RecordingCanvas};
use folio_types::Rect;
use serde_json::Value;
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Every glyph is half an em wide: 5pt per character at 10pt, with a 12pt
/// line (ascent 9.6, descent -2.4).
#[derive(Debug)]
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

/// A page of `width` x `height` points with no margins, set in 10pt Mono.
pub fn page_config(width: f32, height: f32) -> LayoutConfig {
    LayoutConfig {
        page_size: PageSize::Custom { width, height },
        margins: Edges::all(0.0),
        default_font_family: "Mono".to_string(),
        default_font_size: 10.0,
        ..LayoutConfig::default()
    }
}

pub fn pipeline(config: LayoutConfig) -> Result<Pipeline, PipelineError> {
    Ok(Pipeline::builder()
        .with_config(config)
        .with_font("Mono", FontWeight::Regular, FontStyle::Normal, Arc::new(MonospaceFont))?
        .build())
}

pub fn render(width: f32, height: f32, content: Value) -> Result<RenderedDocument, PipelineError> {
    pipeline(page_config(width, height))?.render_value(content)
}

/// Fixed-height block with a background so it shows up on the canvas.
pub fn block(height: f32, color: &str) -> Value {
    serde_json::json!({
        "type": "div",
        "style": { "height": format!("{}pt", height), "background-color": color }
    })
}

pub fn paragraph(text: &str) -> Value {
    serde_json::json!({
        "type": "paragraph",
        "children": [ { "type": "text", "text": text } ]
    })
}

pub fn document(children: Vec<Value>) -> Value {
    serde_json::json!({ "type": "document", "children": children })
}

/// Rectangles that were filled right after being added to the path.
pub fn filled_rects(canvas: &RecordingCanvas) -> Vec<Rect> {
    canvas
        .ops()
        .windows(2)
        .filter_map(|pair| match pair {
            [CanvasOp::Rectangle { rect }, CanvasOp::Fill] => Some(*rect),
            _ => None,
        })
        .collect()
}

pub fn shown_text(canvas: &RecordingCanvas) -> Vec<String> {
    canvas
        .ops()
        .iter()
        .filter_map(|op| match op {
            CanvasOp::ShowGlyphs { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Horizontal offset and baseline of every text run, in order.
pub fn text_origins(canvas: &RecordingCanvas) -> Vec<(f32, f32)> {
    canvas
        .ops()
        .iter()
        .filter_map(|op| match op {
            CanvasOp::SetTextMatrix { matrix } => Some((matrix[4], matrix[5])),
            _ => None,
        })
        .collect()
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
