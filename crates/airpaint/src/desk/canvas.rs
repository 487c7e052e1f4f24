//! Persistent white drawing surface of the desktop painter.

use image::{Rgb, RgbImage};

use crate::raster::{draw_circle, draw_line, draw_rectangle};

use super::ui::Shape;

pub const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// The eraser paints with this multiple of the brush thickness.
pub const ERASER_SCALE: u32 = 4;

#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, PAPER),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = PAPER;
        }
    }

    /// Continuous segment for freestyle drawing and erasing.
    pub fn stroke(
        &mut self,
        shape: Shape,
        from: (i32, i32),
        to: (i32, i32),
        color: Rgb<u8>,
        thickness: u32,
    ) {
        match shape {
            Shape::Eraser => {
                draw_line(&mut self.image, from, to, PAPER, thickness * ERASER_SCALE)
            }
            _ => draw_line(&mut self.image, from, to, color, thickness),
        }
    }

    /// Paint a finished outline shape.
    pub fn commit(
        &mut self,
        shape: Shape,
        start: (i32, i32),
        end: (i32, i32),
        color: Rgb<u8>,
        thickness: u32,
    ) {
        draw_outline(&mut self.image, shape, start, end, color, thickness);
    }

    /// Copy of the canvas with `shape` drawn as a rubber-band preview.
    pub fn with_preview(
        &self,
        shape: Shape,
        start: (i32, i32),
        end: (i32, i32),
        color: Rgb<u8>,
        thickness: u32,
    ) -> RgbImage {
        let mut preview = self.image.clone();
        draw_outline(&mut preview, shape, start, end, color, thickness);
        preview
    }
}

/// Line, rectangle (opposite corners) or circle (centre and rim point).
/// Continuous shapes have no outline and draw nothing here.
pub fn draw_outline(
    image: &mut RgbImage,
    shape: Shape,
    start: (i32, i32),
    end: (i32, i32),
    color: Rgb<u8>,
    thickness: u32,
) {
    match shape {
        Shape::Line => draw_line(image, start, end, color, thickness),
        Shape::Rectangle => draw_rectangle(image, start.0, start.1, end.0, end.1, color, thickness),
        Shape::Circle => {
            let dx = (end.0 - start.0) as f32;
            let dy = (end.1 - start.1) as f32;
            let radius = (dx * dx + dy * dy).sqrt().round() as i32;
            draw_circle(image, start, radius, color, thickness);
        }
        Shape::Freestyle | Shape::Eraser => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn preview_leaves_canvas_untouched() {
        let canvas = Canvas::new(200, 200);
        let preview = canvas.with_preview(Shape::Line, (10, 100), (190, 100), RED, 5);
        assert_eq!(*preview.get_pixel(100, 100), RED);
        assert_eq!(*canvas.image().get_pixel(100, 100), PAPER);
    }

    #[test]
    fn eraser_paints_paper_wider() {
        let mut canvas = Canvas::new(200, 200);
        canvas.stroke(Shape::Freestyle, (10, 100), (190, 100), RED, 9);
        assert_eq!(*canvas.image().get_pixel(100, 104), RED);
        canvas.stroke(Shape::Eraser, (10, 106), (190, 106), RED, 5);
        assert_eq!(*canvas.image().get_pixel(100, 100), PAPER);
        assert_eq!(*canvas.image().get_pixel(100, 104), PAPER);
    }

    #[test]
    fn commit_draws_circle_rim() {
        let mut canvas = Canvas::new(200, 200);
        canvas.commit(Shape::Circle, (100, 100), (140, 100), RED, 3);
        assert_eq!(*canvas.image().get_pixel(140, 100), RED);
        assert_eq!(*canvas.image().get_pixel(100, 100), PAPER);
        canvas.clear();
        assert_eq!(*canvas.image().get_pixel(140, 100), PAPER);
    }
}
