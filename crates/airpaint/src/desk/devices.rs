//! Seams to the local window and the OS pointer.

use anyhow::Result;
use image::RgbImage;

use super::gesture::MouseButton;

pub const WINDOW_TITLE: &str = "Hand Drawing & Gesture Control";

pub trait FrameWindow {
    /// False once the user closed the window or pressed ESC.
    fn is_open(&self) -> bool;
    fn show(&mut self, image: &RgbImage) -> Result<()>;
}

pub trait Pointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;
    fn click(&mut self, button: MouseButton) -> Result<()>;
}

/// Pack RGB pixels as `0x00RRGGBB` words.
pub fn to_argb_words(image: &RgbImage, out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        image
            .pixels()
            .map(|p| (u32::from(p.0[0]) << 16) | (u32::from(p.0[1]) << 8) | u32::from(p.0[2])),
    );
}

#[cfg(feature = "desktop")]
pub use self::native::{EnigoPointer, MinifbWindow};

#[cfg(feature = "desktop")]
mod native {
    use anyhow::{Context, Result};
    use enigo::{Enigo, MouseControllable};
    use image::RgbImage;
    use minifb::{Key, Window, WindowOptions};

    use super::{FrameWindow, Pointer, WINDOW_TITLE, to_argb_words};
    use crate::desk::gesture::MouseButton;

    pub struct MinifbWindow {
        window: Window,
        buffer: Vec<u32>,
    }

    impl MinifbWindow {
        pub fn open(width: usize, height: usize) -> Result<Self> {
            let window = Window::new(WINDOW_TITLE, width, height, WindowOptions::default())
                .with_context(|| format!("failed to open {width}x{height} window"))?;
            Ok(Self {
                window,
                buffer: Vec::with_capacity(width * height),
            })
        }
    }

    impl FrameWindow for MinifbWindow {
        fn is_open(&self) -> bool {
            self.window.is_open() && !self.window.is_key_down(Key::Escape)
        }

        fn show(&mut self, image: &RgbImage) -> Result<()> {
            to_argb_words(image, &mut self.buffer);
            self.window
                .update_with_buffer(&self.buffer, image.width() as usize, image.height() as usize)
                .context("failed to present frame")
        }
    }

    pub struct EnigoPointer {
        enigo: Enigo,
    }

    impl EnigoPointer {
        pub fn new() -> Self {
            Self {
                enigo: Enigo::new(),
            }
        }
    }

    impl Default for EnigoPointer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Pointer for EnigoPointer {
        fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
            self.enigo.mouse_move_to(x, y);
            Ok(())
        }

        fn click(&mut self, button: MouseButton) -> Result<()> {
            let button = match button {
                MouseButton::Left => enigo::MouseButton::Left,
                MouseButton::Right => enigo::MouseButton::Right,
            };
            self.enigo.mouse_click(button);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn packs_rgb_words() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([0x12, 0x34, 0x56]));
        image.put_pixel(1, 0, Rgb([255, 255, 255]));
        let mut words = Vec::new();
        to_argb_words(&image, &mut words);
        assert_eq!(words, vec![0x0012_3456, 0x00FF_FFFF]);
    }
}
