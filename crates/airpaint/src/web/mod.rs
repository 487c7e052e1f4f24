//! Browser front end: the board painted over the camera feed, served as MJPEG.
//!
//! - `pipeline`: capture → detect → paint → encode loop and its supervisor.
//! - `data`: packets and the latest-frame sink shared with the server.
//! - `encoding`: JPEG encoding.
//! - `server`: Actix Web routes.

pub use data::{FramePacket, FrameSink, SessionStatus, StatusResponse};
pub use pipeline::{Producer, run};
pub use server::{
    MJPEG_CONTENT_TYPE, PreviewServer, ServerState, multipart_part, routes, spawn_preview_server,
};

mod data;
mod encoding;
mod html;
mod pipeline;
mod server;
