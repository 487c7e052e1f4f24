use anyhow::Error;
use thiserror::Error;

/// Raw BGR frame captured from a video source.
#[derive(Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: i32,
    pub height: i32,
    pub timestamp_ms: i64,
    pub format: FrameFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    Bgr8,
}

impl FrameFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            FrameFormat::Bgr8 => 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open video source {uri:?}")]
    Open { uri: String },
    #[error("video source {uri:?} ended")]
    Ended { uri: String },
    #[error("frame buffer holds {got} bytes, expected {expected}")]
    Truncated { got: usize, expected: usize },
    #[error(transparent)]
    Other(#[from] Error),
}

impl Frame {
    /// Number of bytes a well-formed frame of this size must carry.
    pub fn expected_len(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize) * self.format.bytes_per_pixel()
    }

    pub fn validate(&self) -> Result<(), CaptureError> {
        let expected = self.expected_len();
        if self.data.len() != expected {
            return Err(CaptureError::Truncated {
                got: self.data.len(),
                expected,
            });
        }
        Ok(())
    }

    /// Flip the frame left-to-right in place so the preview behaves like a mirror.
    pub fn mirror_horizontal(&mut self) {
        let bpp = self.format.bytes_per_pixel();
        let width = self.width.max(0) as usize;
        let row_bytes = width * bpp;
        if row_bytes == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_bytes) {
            let (mut left, mut right) = (0usize, width.saturating_sub(1));
            while left < right {
                for channel in 0..bpp {
                    row.swap(left * bpp + channel, right * bpp + channel);
                }
                left += 1;
                right -= 1;
            }
        }
    }
}
