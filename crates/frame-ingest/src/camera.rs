//! Device addressing shared by the capture backends, plus the OpenCV reader
//! when the `opencv` feature is enabled.

/// Parse a `/dev/videoX` style URI and return the zero-based index if present.
pub(crate) fn parse_device_index(uri: &str) -> Option<i32> {
    if let Ok(index) = uri.parse::<i32>() {
        return Some(index);
    }
    if let Some(stripped) = uri.strip_prefix("/dev/video") {
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = stripped.parse::<i32>() {
                return Some(index);
            }
        }
    }
    None
}

#[cfg(feature = "opencv")]
pub use self::opencv_backend::OpenCvCamera;

#[cfg(feature = "opencv")]
mod opencv_backend {
    use chrono::Utc;
    use opencv::{
        core::{self, MatTraitConstManual},
        prelude::*,
        videoio::{self, VideoCapture, VideoCaptureTrait},
    };
    use tracing::warn;

    use super::parse_device_index;
    use crate::{
        FrameSource,
        types::{CaptureError, Frame, FrameFormat},
    };

    /// OpenCV `VideoCapture` wrapper producing BGR frames at a fixed size.
    pub struct OpenCvCamera {
        uri: String,
        cap: VideoCapture,
        frame: Mat,
        scratch: Mat,
        target_size: (i32, i32),
    }

    impl OpenCvCamera {
        pub fn open(uri: &str, target_size: (i32, i32), fps: u32) -> Result<Self, CaptureError> {
            let mut cap = open_video_capture(uri)?;
            configure_camera(&mut cap, target_size, fps as f64);
            Ok(Self {
                uri: uri.to_string(),
                cap,
                frame: Mat::default(),
                scratch: Mat::default(),
                target_size,
            })
        }
    }

    impl FrameSource for OpenCvCamera {
        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            let (target_w, target_h) = self.target_size;
            loop {
                let ok = self
                    .cap
                    .read(&mut self.frame)
                    .map_err(|e| CaptureError::Other(e.into()))?;
                if !ok {
                    return Err(CaptureError::Ended {
                        uri: self.uri.clone(),
                    });
                }

                let size = self.frame.size().map_err(|e| CaptureError::Other(e.into()))?;
                if size.width <= 0 {
                    continue;
                }

                let working = if size.width != target_w || size.height != target_h {
                    opencv::imgproc::resize(
                        &self.frame,
                        &mut self.scratch,
                        core::Size {
                            width: target_w,
                            height: target_h,
                        },
                        0.0,
                        0.0,
                        opencv::imgproc::INTER_LINEAR,
                    )
                    .map_err(|e| CaptureError::Other(e.into()))?;
                    &self.scratch
                } else {
                    &self.frame
                };

                let data = working
                    .data_bytes()
                    .map_err(|e| CaptureError::Other(e.into()))?
                    .to_vec();

                return Ok(Frame {
                    data,
                    width: target_w,
                    height: target_h,
                    timestamp_ms: Utc::now().timestamp_millis(),
                    format: FrameFormat::Bgr8,
                });
            }
        }

        fn resolution(&self) -> (i32, i32) {
            self.target_size
        }
    }

    fn open_video_capture(uri: &str) -> Result<VideoCapture, CaptureError> {
        if let Some(index) = parse_device_index(uri) {
            for backend in [videoio::CAP_V4L, videoio::CAP_ANY] {
                match VideoCapture::new(index, backend) {
                    Ok(cap) => {
                        if cap.is_opened().map_err(|e| CaptureError::Other(e.into()))? {
                            return Ok(cap);
                        }
                    }
                    Err(err) => {
                        warn!("failed to open device #{index} with backend {backend}: {err}");
                    }
                }
            }
        }

        match VideoCapture::from_file(uri, videoio::CAP_ANY) {
            Ok(cap) if cap.is_opened().map_err(|e| CaptureError::Other(e.into()))? => Ok(cap),
            Ok(_) => Err(CaptureError::Open {
                uri: uri.to_string(),
            }),
            Err(err) => {
                warn!("failed to open {uri}: {err}");
                Err(CaptureError::Open {
                    uri: uri.to_string(),
                })
            }
        }
    }

    fn configure_camera(cap: &mut VideoCapture, target_size: (i32, i32), fps: f64) {
        if let Ok(mjpg) = videoio::VideoWriter::fourcc('M', 'J', 'P', 'G') {
            let _ = cap.set(videoio::CAP_PROP_FOURCC, mjpg as f64);
        }
        let _ = cap.set(videoio::CAP_PROP_FRAME_WIDTH, target_size.0 as f64);
        let _ = cap.set(videoio::CAP_PROP_FRAME_HEIGHT, target_size.1 as f64);
        let _ = cap.set(videoio::CAP_PROP_FPS, fps);
    }
}

#[cfg(test)]
mod tests {
    use super::parse_device_index;

    #[test]
    fn parses_indices_and_dev_paths() {
        assert_eq!(parse_device_index("0"), Some(0));
        assert_eq!(parse_device_index("/dev/video3"), Some(3));
        assert_eq!(parse_device_index("/dev/video"), None);
        assert_eq!(parse_device_index("/dev/videoX"), None);
        assert_eq!(parse_device_index("clip.mp4"), None);
    }
}
