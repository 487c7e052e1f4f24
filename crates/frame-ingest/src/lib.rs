//! Camera ingest for the airpaint programs.
//!
//! A [`FrameSource`] yields BGR frames synchronously; the desktop painter reads
//! one directly while the web painter runs it on a background thread through
//! [`spawn_camera_reader`].

use std::thread;

use crossbeam_channel::{Receiver, bounded};
use tracing::{debug, warn};

mod camera;
mod ffmpeg;
mod types;

#[cfg(feature = "opencv")]
pub use camera::OpenCvCamera;
pub use ffmpeg::FfmpegCamera;
pub use types::{CaptureError, Frame, FrameFormat};

/// Capture rate requested from devices.
pub const DEFAULT_FPS: u32 = 30;

/// Anything that can produce frames on demand. Reads block until a frame is ready.
pub trait FrameSource: Send {
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Size of the frames this source delivers.
    fn resolution(&self) -> (i32, i32);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureBackend {
    #[default]
    Ffmpeg,
    #[cfg(feature = "opencv")]
    OpenCv,
}

/// Open `uri` with the chosen backend at `target_size` (width, height).
pub fn open_camera(
    uri: &str,
    target_size: (i32, i32),
    backend: CaptureBackend,
) -> Result<Box<dyn FrameSource>, CaptureError> {
    if target_size.0 <= 0 || target_size.1 <= 0 {
        return Err(CaptureError::Open {
            uri: uri.to_string(),
        });
    }
    debug!(
        "opening capture source {uri} at {}x{} ({backend:?})",
        target_size.0, target_size.1
    );
    match backend {
        CaptureBackend::Ffmpeg => Ok(Box::new(FfmpegCamera::open(uri, target_size, DEFAULT_FPS)?)),
        #[cfg(feature = "opencv")]
        CaptureBackend::OpenCv => Ok(Box::new(OpenCvCamera::open(uri, target_size, DEFAULT_FPS)?)),
    }
}

/// Spawns a background thread that continually reads frames from `source`.
///
/// The channel is small so the capture loop is backpressured when the consumer
/// falls behind. The first error is forwarded and ends the thread; dropping the
/// receiver ends it too.
pub fn spawn_camera_reader(
    mut source: Box<dyn FrameSource>,
) -> std::io::Result<Receiver<Result<Frame, CaptureError>>> {
    let (tx, rx) = bounded(2);
    thread::Builder::new()
        .name("frame-ingest".into())
        .spawn(move || {
            loop {
                match source.read_frame() {
                    Ok(frame) => {
                        if tx.send(Ok(frame)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!("capture stopped: {err}");
                        let _ = tx.send(Err(err));
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSource {
        remaining: usize,
    }

    impl FrameSource for CountingSource {
        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            if self.remaining == 0 {
                return Err(CaptureError::Ended {
                    uri: "counting".into(),
                });
            }
            self.remaining -= 1;
            Ok(Frame {
                data: vec![self.remaining as u8; 3],
                width: 1,
                height: 1,
                timestamp_ms: 0,
                format: FrameFormat::Bgr8,
            })
        }

        fn resolution(&self) -> (i32, i32) {
            (1, 1)
        }
    }

    #[test]
    fn reader_forwards_frames_then_the_error() {
        let rx = spawn_camera_reader(Box::new(CountingSource { remaining: 3 })).unwrap();
        let mut frames = 0;
        let mut ended = false;
        for item in rx.iter() {
            match item {
                Ok(_) => frames += 1,
                Err(CaptureError::Ended { .. }) => ended = true,
                Err(other) => panic!("unexpected error {other}"),
            }
        }
        assert_eq!(frames, 3);
        assert!(ended);
    }

    #[test]
    fn rejects_empty_target_size() {
        assert!(open_camera("0", (0, 480), CaptureBackend::Ffmpeg).is_err());
    }
}
