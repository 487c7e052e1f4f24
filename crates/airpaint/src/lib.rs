//! Hand-gesture painting over a live camera feed.
//!
//! Two front ends share the landmark model from `hand-core` and capture from
//! `frame-ingest`:
//! - [`web`]: the board painted onto the mirrored feed and served as MJPEG.
//! - [`desk`]: a local window painter that can also drive the OS pointer.

pub mod board;
pub mod cli;
pub mod config;
pub mod cooldown;
pub mod desk;
pub mod raster;
pub mod telemetry;
pub mod web;

pub use config::{DeskConfig, LandmarkSource, TelemetryOptions, WebConfig};
