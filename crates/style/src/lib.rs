pub mod background;
pub mod border;
pub mod dimension;
pub mod font;
pub mod parsers;
pub mod position;
pub mod text;

pub use background::{Background, BackgroundImage, BackgroundRepeat};
pub use border::{Border, BorderRadius, BorderStyle, Outline};
pub use dimension::{Dimension, Edges, PageSize};
pub use font::{FontStyle, FontWeight};
pub use parsers::StyleParseError;
pub use position::{BoxSizing, Float, Overflow, Position};
pub use text::{BaseDirection, TextAlign, TextDecoration};
