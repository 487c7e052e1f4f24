//! JPEG encoding of composited frames.

use anyhow::{Context, Result};
use image::{RgbImage, codecs::jpeg::JpegEncoder};

#[derive(Clone, Copy, Debug)]
pub struct FrameEncoder {
    quality: u8,
}

impl FrameEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn encode(&self, image: &RgbImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(image.as_raw().len() / 8);
        JpegEncoder::new_with_quality(&mut buffer, self.quality)
            .encode_image(image)
            .with_context(|| {
                format!(
                    "jpeg encode failed for {}x{} frame",
                    image.width(),
                    image.height()
                )
            })?;
        Ok(buffer)
    }
}
