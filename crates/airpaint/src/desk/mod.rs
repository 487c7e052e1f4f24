//! Desktop front end: a local window that paints shapes onto a white canvas
//! and can drive the OS pointer.

pub mod canvas;
pub mod devices;
pub mod gesture;
pub mod render;
pub mod runner;
pub mod session;
pub mod ui;

pub use devices::{FrameWindow, Pointer, WINDOW_TITLE};
pub use gesture::{ClickTrigger, DeskIntent, Mode, MouseButton};
pub use runner::{DeskApp, drive, run};
pub use session::{DeskBrush, DeskSession};
pub use ui::{DeskLayout, Shape};
