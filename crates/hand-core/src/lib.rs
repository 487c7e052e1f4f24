//! Hand landmark model and the seams through which an external detector is
//! consumed.
//!
//! Detection itself happens elsewhere: a [`LandmarkProvider`] turns a frame
//! into at most one [`Hand`]. Everything here is plain data plus the small
//! amount of geometry the gesture interpreters need.

pub mod geometry;
pub mod landmarks;
pub mod provider;
pub mod replay;
pub mod sidecar;
pub mod wire;

pub use geometry::{angle_deg, distance};
pub use landmarks::{Fingers, Hand, Handedness, LANDMARK_COUNT, Landmark};
pub use provider::{FrameView, LandmarkProvider, NoHands, ProviderError};
pub use replay::ReplayProvider;
pub use sidecar::SidecarProvider;
