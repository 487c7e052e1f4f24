use thiserror::Error;

use crate::landmarks::Hand;

/// Borrowed BGR image handed to a landmark provider.
#[derive(Clone, Copy)]
pub struct FrameView<'a> {
    pub bgr: &'a [u8],
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("landmark provider process failed: {0}")]
    Process(#[from] std::io::Error),
    #[error("landmark provider closed its output")]
    Closed,
    #[error("malformed landmark line: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("frame buffer holds {got} bytes, expected {expected}")]
    FrameSize { got: usize, expected: usize },
}

/// External hand-landmark detector. Returns at most one hand per frame.
pub trait LandmarkProvider: Send {
    fn detect(&mut self, frame: FrameView<'_>) -> Result<Option<Hand>, ProviderError>;
}

/// Provider that never sees a hand; useful for running the preview without a detector.
#[derive(Debug, Default)]
pub struct NoHands;

impl LandmarkProvider for NoHands {
    fn detect(&mut self, _frame: FrameView<'_>) -> Result<Option<Hand>, ProviderError> {
        Ok(None)
    }
}

impl<P: LandmarkProvider + ?Sized> LandmarkProvider for Box<P> {
    fn detect(&mut self, frame: FrameView<'_>) -> Result<Option<Hand>, ProviderError> {
        (**self).detect(frame)
    }
}
