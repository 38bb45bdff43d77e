//! Operator-based drawing surface.
//!
//! Paint emits a flat sequence of path, state, text and marked-content
//! operators. A backend maps them onto its page-description format;
//! [`RecordingCanvas`] just keeps them for inspection.

use crate::font::Glyph;
use folio_types::{AffineTransform, Color, Rect, ResourceUri};
use serde::Serialize;

pub trait Canvas {
    fn save_state(&mut self);
    fn restore_state(&mut self);

    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32);
    fn rectangle(&mut self, rect: Rect);
    fn close_path(&mut self);

    /// Intersects the clip with the current path and starts a new path.
    fn clip(&mut self);
    /// Discards the current path without painting it.
    fn end_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f32);
    fn set_line_dash(&mut self, pattern: Option<[f32; 2]>);
    fn concat_matrix(&mut self, transform: AffineTransform);
    /// Sets fill and stroke alpha through an extended graphics state.
    fn set_opacity(&mut self, fill: f32, stroke: f32);

    fn begin_text(&mut self);
    fn end_text(&mut self);
    fn set_font(&mut self, font: &str, size: f32);
    fn set_text_matrix(&mut self, transform: AffineTransform);
    fn set_text_rise(&mut self, rise: f32);
    fn show_glyphs(&mut self, glyphs: &[Glyph]);

    /// Opens a marked-content sequence (a structure tag or an artifact).
    fn open_tag(&mut self, tag: &str);
    fn close_tag(&mut self);

    fn add_image(&mut self, source: &ResourceUri, rect: Rect);
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum CanvasOp {
    SaveState,
    RestoreState,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    CurveTo { points: [f32; 6] },
    Rectangle { rect: Rect },
    ClosePath,
    Clip,
    EndPath,
    Fill,
    Stroke,
    SetFillColor { color: Color },
    SetStrokeColor { color: Color },
    SetLineWidth { width: f32 },
    SetLineDash { pattern: Option<[f32; 2]> },
    ConcatMatrix { matrix: [f32; 6] },
    SetOpacity { fill: f32, stroke: f32 },
    BeginText,
    EndText,
    SetFont { font: String, size: f32 },
    SetTextMatrix { matrix: [f32; 6] },
    SetTextRise { rise: f32 },
    ShowGlyphs { text: String, glyph_count: usize },
    OpenTag { tag: String },
    CloseTag,
    AddImage { source: ResourceUri, rect: Rect },
}

/// A canvas that records every call in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingCanvas {
    pub ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Concatenated text of every `ShowGlyphs` call.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::ShowGlyphs { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn count(&self, predicate: impl Fn(&CanvasOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }

    fn push(&mut self, op: CanvasOp) {
        self.ops.push(op);
    }
}

impl Canvas for RecordingCanvas {
    fn save_state(&mut self) {
        self.push(CanvasOp::SaveState);
    }

    fn restore_state(&mut self) {
        self.push(CanvasOp::RestoreState);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push(CanvasOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(CanvasOp::LineTo { x, y });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.push(CanvasOp::CurveTo {
            points: [x1, y1, x2, y2, x3, y3],
        });
    }

    fn rectangle(&mut self, rect: Rect) {
        self.push(CanvasOp::Rectangle { rect });
    }

    fn close_path(&mut self) {
        self.push(CanvasOp::ClosePath);
    }

    fn clip(&mut self) {
        self.push(CanvasOp::Clip);
    }

    fn end_path(&mut self) {
        self.push(CanvasOp::EndPath);
    }

    fn fill(&mut self) {
        self.push(CanvasOp::Fill);
    }

    fn stroke(&mut self) {
        self.push(CanvasOp::Stroke);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.push(CanvasOp::SetFillColor { color });
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.push(CanvasOp::SetStrokeColor { color });
    }

    fn set_line_width(&mut self, width: f32) {
        self.push(CanvasOp::SetLineWidth { width });
    }

    fn set_line_dash(&mut self, pattern: Option<[f32; 2]>) {
        self.push(CanvasOp::SetLineDash { pattern });
    }

    fn concat_matrix(&mut self, transform: AffineTransform) {
        self.push(CanvasOp::ConcatMatrix {
            matrix: transform.as_array(),
        });
    }

    fn set_opacity(&mut self, fill: f32, stroke: f32) {
        self.push(CanvasOp::SetOpacity { fill, stroke });
    }

    fn begin_text(&mut self) {
        self.push(CanvasOp::BeginText);
    }

    fn end_text(&mut self) {
        self.push(CanvasOp::EndText);
    }

    fn set_font(&mut self, font: &str, size: f32) {
        self.push(CanvasOp::SetFont {
            font: font.to_string(),
            size,
        });
    }

    fn set_text_matrix(&mut self, transform: AffineTransform) {
        self.push(CanvasOp::SetTextMatrix {
            matrix: transform.as_array(),
        });
    }

    fn set_text_rise(&mut self, rise: f32) {
        self.push(CanvasOp::SetTextRise { rise });
    }

    fn show_glyphs(&mut self, glyphs: &[Glyph]) {
        let text = glyphs.iter().filter_map(|g| g.unicode).collect();
        self.push(CanvasOp::ShowGlyphs {
            text,
            glyph_count: glyphs.len(),
        });
    }

    fn open_tag(&mut self, tag: &str) {
        self.push(CanvasOp::OpenTag {
            tag: tag.to_string(),
        });
    }

    fn close_tag(&mut self) {
        self.push(CanvasOp::CloseTag);
    }

    fn add_image(&mut self, source: &ResourceUri, rect: Rect) {
        self.push(CanvasOp::AddImage {
            source: source.clone(),
            rect,
        });
    }
}
