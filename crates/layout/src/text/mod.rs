//! Glyph lines, shaping, bidi reordering and line breaking.

pub mod bidi;
pub mod glyph;
pub mod line_breaker;
pub mod metrics;
pub mod shaper;

pub use bidi::{VisualRun, visual_runs};
pub use glyph::{GlyphLine, is_invisible, scale};
pub use line_breaker::{BreakStatus, LineBreak, LineBreakRequest, break_line};
pub use metrics::{LineMetrics, ascender_descender};
pub use shaper::ShapedFont;
