//! Single-threaded desktop loop: read, detect, act, show.

use std::time::Instant;

use anyhow::{Context, Result};
use frame_ingest::{CaptureError, Frame, FrameSource};
use hand_core::{FrameView, LandmarkProvider};
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::{config::DeskConfig, raster::frame_to_rgb, telemetry};

use super::{
    devices::{FrameWindow, Pointer},
    gesture::{ClickTrigger, DeskIntent},
    render::compose,
    session::DeskSession,
};

/// Run the desktop painter until the window closes or the source ends.
pub fn run(config: DeskConfig) -> Result<()> {
    let _telemetry_guard = telemetry::enter_runtime(&config.telemetry);
    let _desk_guard = tracing::info_span!(
        "desk",
        source = %config.capture.uri,
        width = config.capture.width,
        height = config.capture.height
    )
    .entered();

    let mut source = frame_ingest::open_camera(
        &config.capture.uri,
        (config.capture.width, config.capture.height),
        config.capture.backend,
    )
    .with_context(|| format!("failed to open capture source {}", config.capture.uri))?;
    let provider = config.landmarks.build()?;
    let (width, height) = source.resolution();
    let mut app = DeskApp::new(
        provider,
        (width, height),
        (config.screen_width, config.screen_height),
        config.click_trigger,
    );
    open_devices_and_drive(source.as_mut(), &mut app, width, height)
}

#[cfg(feature = "desktop")]
fn open_devices_and_drive(
    source: &mut dyn FrameSource,
    app: &mut DeskApp,
    width: i32,
    height: i32,
) -> Result<()> {
    use super::devices::{EnigoPointer, MinifbWindow};

    let mut window = MinifbWindow::open(width as usize, height as usize)?;
    let mut pointer = EnigoPointer::new();
    let frames = drive(source, app, &mut window, &mut pointer)?;
    info!(frames, "desktop session ended");
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn open_devices_and_drive(
    _source: &mut dyn FrameSource,
    _app: &mut DeskApp,
    _width: i32,
    _height: i32,
) -> Result<()> {
    anyhow::bail!("`airpaint desk` needs a build with the `desktop` feature")
}

/// Pump frames until the window closes or a frame cannot be read.
/// Returns the number of frames shown.
pub fn drive<W, P>(
    source: &mut dyn FrameSource,
    app: &mut DeskApp,
    window: &mut W,
    pointer: &mut P,
) -> Result<u64>
where
    W: FrameWindow + ?Sized,
    P: Pointer + ?Sized,
{
    let mut shown = 0u64;
    while window.is_open() {
        let frame = match source.read_frame() {
            Ok(frame) => frame,
            Err(CaptureError::Ended { uri }) => {
                info!("capture source {uri} ended");
                break;
            }
            Err(err) => {
                warn!("capture failed, stopping: {err}");
                break;
            }
        };
        let (image, _) = app.step(frame, pointer)?;
        window.show(&image)?;
        shown += 1;
    }
    Ok(shown)
}

/// Landmark provider plus desktop session.
pub struct DeskApp {
    provider: Box<dyn LandmarkProvider>,
    session: DeskSession,
    mirror: bool,
    frame_number: u64,
}

impl DeskApp {
    pub fn new(
        provider: Box<dyn LandmarkProvider>,
        frame_size: (i32, i32),
        screen: (i32, i32),
        trigger: ClickTrigger,
    ) -> Self {
        Self {
            provider,
            session: DeskSession::new(frame_size.0, frame_size.1, screen, trigger),
            mirror: true,
            frame_number: 0,
        }
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn session(&self) -> &DeskSession {
        &self.session
    }

    /// Process one frame: interpret the hand, drive the pointer, and return the
    /// image to show.
    pub fn step<P: Pointer + ?Sized>(
        &mut self,
        mut frame: Frame,
        pointer: &mut P,
    ) -> Result<(RgbImage, DeskIntent)> {
        let started = Instant::now();
        self.frame_number = self.frame_number.wrapping_add(1);
        frame.validate()?;
        if self.mirror {
            frame.mirror_horizontal();
        }

        let view = FrameView {
            bgr: &frame.data,
            width: frame.width,
            height: frame.height,
        };
        let hand = match self.provider.detect(view) {
            Ok(hand) => hand.filter(|hand| hand.is_complete()),
            Err(err) => {
                warn!("landmark provider failed: {err}");
                None
            }
        };

        let intent = self.session.observe(hand.as_ref());
        let pointer_result = match intent {
            DeskIntent::MoveCursor { to } => pointer.move_to(to.0, to.1),
            DeskIntent::Click { button } => {
                debug!(?button, "click");
                pointer.click(button)
            }
            _ => Ok(()),
        };
        if let Err(err) = pointer_result {
            warn!("pointer action failed: {err:?}");
        }
        metrics::counter!("airpaint_intents_total", "intent" => intent.label()).increment(1);

        let mut image = frame_to_rgb(&frame)?;
        compose(&mut image, &self.session, hand.as_ref())?;

        metrics::counter!("airpaint_frames_total").increment(1);
        metrics::histogram!("airpaint_stage_latency_seconds", "stage" => "frame")
            .record(started.elapsed().as_secs_f64());
        Ok((image, intent))
    }
}
