//! Collaborator seams consumed by the layout engine.
//!
//! The engine never shapes text, hyphenates words, or writes an output
//! format itself. It talks to the implementations of the traits below, and
//! this crate ships in-memory implementations of each for embedding and tests.

pub mod canvas;
pub mod document;
pub mod font;
pub mod hyphenation;

pub use canvas::{Canvas, CanvasOp, RecordingCanvas};
pub use document::{Annotation, DocumentSink, InMemoryDocument};
pub use font::{
    FontError, FontMetrics, FontProgram, FontProvider, FontQuery, Glyph, InMemoryFontProvider,
    SharedFont, TEXT_SPACE_COEFF,
};
pub use hyphenation::{DictionaryHyphenator, Hyphenation, Hyphenator};
