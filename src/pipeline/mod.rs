//! Document rendering pipeline.
//!
//! - [`PipelineBuilder`]: fluent builder collecting the layout configuration,
//!   fonts and an optional hyphenator
//! - [`Pipeline`]: lays out a content tree and paints every page into a
//!   [`RecordingCanvas`](folio_traits::RecordingCanvas)
//!
//! # Example
//!
//! ```ignore
//! use folio::Pipeline;
//!
//! let pipeline = Pipeline::builder()
//!     .with_font_file("Body", "fonts/body.ttf")?
//!     .build();
//!
//! let rendered = pipeline.render_json(r#"{ "type": "text", "text": "Hello" }"#)?;
//! assert_eq!(rendered.pages.len(), 1);
//! ```

mod builder;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use orchestrator::{Pipeline, RenderedDocument};
