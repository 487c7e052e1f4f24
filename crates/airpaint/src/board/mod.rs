//! The web painter: stroke list, brush, button layout, gesture interpretation
//! and rendering.

pub mod brush;
pub mod color;
pub mod gesture;
pub mod layout;
pub mod render;
pub mod session;
pub mod strokes;

pub use brush::Brush;
pub use color::PaintColor;
pub use gesture::{HandInput, Intent, interpret};
pub use layout::{BoardLayout, ButtonAction, Rect};
pub use render::{draw_skeleton, render_board};
pub use session::{BoardSettings, Session};
pub use strokes::{StrokeEntry, StrokeList, StrokePoint};
