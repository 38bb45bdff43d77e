//! Paint pass: turns laid-out nodes into canvas operators.

pub mod background;
pub mod border;
pub mod clip;
pub mod context;
pub mod pipeline;

pub use context::DrawContext;
pub use pipeline::{draw, draw_child, drain_deferred};
