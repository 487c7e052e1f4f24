//! Capture → detect → paint → encode → publish loop for the web painter.

use std::{
    sync::{
        Arc, Once,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use actix_web::web::Bytes;
use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use frame_ingest::{CaptureError, Frame};
use hand_core::{FrameView, LandmarkProvider};
use tracing::{debug, error, info, warn};

use crate::{
    board::{BoardLayout, BoardSettings, HandInput, Session, render_board},
    config::WebConfig,
    raster::frame_to_rgb,
    telemetry,
    web::{
        data::{FramePacket, FrameSink, SessionStatus},
        encoding::FrameEncoder,
        server::spawn_preview_server,
    },
};

/// Run the web painter until Ctrl+C.
pub fn run(config: WebConfig) -> Result<()> {
    static CTRL_HANDLER: Once = Once::new();

    let _telemetry_guard = telemetry::enter_runtime(&config.telemetry);
    let _ = telemetry::init_metrics_recorder();
    let pipeline_span = tracing::info_span!(
        "web.pipeline",
        source = %config.capture.uri,
        width = config.capture.width,
        height = config.capture.height,
        jpeg_quality = config.jpeg_quality,
        mirror = config.mirror
    );
    let _pipeline_guard = pipeline_span.enter();

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_shutdown = shutdown.clone();
    CTRL_HANDLER.call_once(move || {
        if let Err(err) = ctrlc::set_handler(move || {
            handler_shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Failed to install Ctrl+C handler: {err}");
        }
    });

    let source = frame_ingest::open_camera(
        &config.capture.uri,
        (config.capture.width, config.capture.height),
        config.capture.backend,
    )
    .with_context(|| format!("failed to open capture source {}", config.capture.uri))?;
    let frames = frame_ingest::spawn_camera_reader(source).context("failed to start capture")?;
    let provider = config.landmarks.build()?;

    let sink = FrameSink::new();
    let server = spawn_preview_server(sink.clone(), &config.bind, config.port)
        .context("failed to start preview server")?;

    let mut producer = Producer::new(provider, sink, &config);
    let producer_shutdown = shutdown.clone();
    let producer_handle = telemetry::spawn_thread("airpaint-producer", move || {
        producer.run(frames, &producer_shutdown)
    })
    .context("failed to spawn producer thread")?;

    info!("press Ctrl+C to stop");
    while !shutdown.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(100));
    }

    info!("stopping");
    if producer_handle.join().is_err() {
        error!("producer thread panicked");
    }
    server.stop();
    Ok(())
}

/// Owns the board session and turns captured frames into published packets.
pub struct Producer {
    provider: Box<dyn LandmarkProvider>,
    sink: FrameSink,
    encoder: FrameEncoder,
    settings: BoardSettings,
    mirror: bool,
    session: Option<Session>,
    frame_number: u64,
    smoothed_fps: f32,
    last_instant: Option<Instant>,
}

impl Producer {
    pub fn new(provider: Box<dyn LandmarkProvider>, sink: FrameSink, config: &WebConfig) -> Self {
        Self {
            provider,
            sink,
            encoder: FrameEncoder::new(config.jpeg_quality),
            settings: config.board.clone(),
            mirror: config.mirror,
            session: None,
            frame_number: 0,
            smoothed_fps: 0.0,
            last_instant: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Drain frames until shutdown or the first capture failure. The last
    /// published frame stays available to the server afterwards.
    pub fn run(&mut self, frames: Receiver<Result<Frame, CaptureError>>, shutdown: &AtomicBool) {
        let _worker_guard = tracing::info_span!("producer.worker").entered();
        while !shutdown.load(Ordering::Relaxed) {
            let frame = match frames.recv_timeout(Duration::from_millis(100)) {
                Ok(Ok(frame)) => frame,
                Ok(Err(err)) => {
                    error!("Capture error: {err}");
                    break;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    error!("Frame channel closed");
                    break;
                }
            };
            if let Err(err) = self.process_frame(frame) {
                error!("Frame processing failed: {err:?}");
                break;
            }
        }
        debug!(frames = self.frame_number, "producer stopped");
    }

    /// Process one captured frame end to end and publish the result.
    pub fn process_frame(&mut self, mut frame: Frame) -> Result<FramePacket> {
        let frame_start = Instant::now();
        self.frame_number = self.frame_number.wrapping_add(1);
        self.update_fps(frame_start);
        let frame_span = tracing::info_span!(
            "frame",
            frame = self.frame_number,
            width = frame.width,
            height = frame.height,
            timestamp = frame.timestamp_ms
        );
        let _frame_guard = frame_span.enter();

        frame.validate()?;
        if self.mirror {
            frame.mirror_horizontal();
        }
        let (width, height) = (frame.width, frame.height);

        let detect_start = Instant::now();
        let view = FrameView {
            bgr: &frame.data,
            width,
            height,
        };
        let hand = match self.provider.detect(view) {
            Ok(hand) => hand.filter(|hand| hand.is_complete()),
            Err(err) => {
                warn!("landmark provider failed: {err}");
                None
            }
        };
        metrics::histogram!("airpaint_stage_latency_seconds", "stage" => "detect")
            .record(detect_start.elapsed().as_secs_f64());

        let settings = &self.settings;
        let session = self.session.get_or_insert_with(|| {
            Session::new(BoardLayout::for_frame(width, height), settings.clone())
        });
        let input = hand
            .as_ref()
            .and_then(|hand| HandInput::from_hand(hand, width, height));
        let intent = session.observe(input.as_ref(), Instant::now());
        metrics::counter!("airpaint_intents_total", "intent" => intent.label()).increment(1);
        metrics::gauge!("airpaint_stroke_points").set(session.strokes.point_count() as f64);

        let render_start = Instant::now();
        let mut image = frame_to_rgb(&frame)?;
        render_board(&mut image, session, hand.as_ref());
        metrics::histogram!("airpaint_stage_latency_seconds", "stage" => "render")
            .record(render_start.elapsed().as_secs_f64());

        let encode_start = Instant::now();
        let jpeg = self.encoder.encode(&image)?;
        metrics::histogram!("airpaint_stage_latency_seconds", "stage" => "encode")
            .record(encode_start.elapsed().as_secs_f64());

        let packet = FramePacket {
            jpeg: Bytes::from(jpeg),
            frame_number: self.frame_number,
            timestamp_ms: frame.timestamp_ms,
            fps: self.smoothed_fps,
            status: SessionStatus::of(session),
        };
        self.sink.publish(packet.clone());

        metrics::counter!("airpaint_frames_total").increment(1);
        metrics::histogram!("airpaint_stage_latency_seconds", "stage" => "frame")
            .record(frame_start.elapsed().as_secs_f64());
        if self.frame_number % 30 == 0 {
            debug!(
                "heartbeat: frame #{}, {:.1} fps, intent {}",
                self.frame_number,
                self.smoothed_fps,
                intent.label()
            );
        }
        Ok(packet)
    }

    fn update_fps(&mut self, now: Instant) {
        if let Some(last) = self.last_instant.replace(now) {
            let elapsed = now.duration_since(last).as_secs_f32();
            if elapsed > 0.0 {
                let instant = 1.0 / elapsed;
                self.smoothed_fps = if self.smoothed_fps == 0.0 {
                    instant
                } else {
                    0.9 * self.smoothed_fps + 0.1 * instant
                };
            }
        }
        metrics::gauge!("airpaint_pipeline_fps").set(self.smoothed_fps as f64);
    }
}
