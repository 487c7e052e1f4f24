//! Palette and shape buttons of the desktop painter.

use image::{Rgb, RgbImage};
use serde::Serialize;

use crate::{
    board::{PaintColor, Rect},
    raster::{draw_label, fill_rect, text_width},
};

pub const DESK_PALETTE: [PaintColor; 8] = [
    PaintColor::BLUE,
    PaintColor::GREEN,
    PaintColor::RED,
    PaintColor::CYAN,
    PaintColor::AZURE,
    PaintColor::WHITE,
    PaintColor::PURPLE,
    PaintColor::YELLOW,
];

const SWATCH_PITCH: i32 = 80;
const SWATCH_SIZE: i32 = 70;
const SHAPE_PITCH: i32 = 120;
const SHAPE_WIDTH: i32 = 110;

const BUTTON_GREY: Rgb<u8> = Rgb([200, 200, 200]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    #[default]
    Line,
    Rectangle,
    Circle,
    Freestyle,
    Eraser,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Line,
        Shape::Rectangle,
        Shape::Circle,
        Shape::Freestyle,
        Shape::Eraser,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Line => "Line",
            Shape::Rectangle => "Rectangle",
            Shape::Circle => "Circle",
            Shape::Freestyle => "Freestyle",
            Shape::Eraser => "Eraser",
        }
    }

    /// Shapes painted while the finger moves rather than on release.
    pub fn is_continuous(self) -> bool {
        matches!(self, Shape::Freestyle | Shape::Eraser)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeskHit {
    Color(usize),
    Shape(Shape),
}

/// Button placement for a `width` x `height` frame: swatches centred along the
/// top edge, shape buttons centred along the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeskLayout {
    pub width: i32,
    pub height: i32,
}

impl DeskLayout {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn swatch(&self, index: usize) -> Rect {
        let start = self.width / 2 - (DESK_PALETTE.len() as i32 * SWATCH_PITCH) / 2;
        let left = start + index as i32 * SWATCH_PITCH;
        Rect::new(left, 20, left + SWATCH_SIZE, 90)
    }

    pub fn shape_button(&self, index: usize) -> Rect {
        let start = self.width / 2 - (Shape::ALL.len() as i32 * SHAPE_PITCH) / 2;
        let left = start + index as i32 * SHAPE_PITCH;
        Rect::new(left, self.height - 80, left + SHAPE_WIDTH, self.height - 30)
    }

    pub fn hit(&self, point: (i32, i32)) -> Option<DeskHit> {
        if let Some(idx) = (0..DESK_PALETTE.len()).find(|&i| self.swatch(i).contains(point)) {
            return Some(DeskHit::Color(idx));
        }
        Shape::ALL
            .iter()
            .enumerate()
            .find(|(i, _)| self.shape_button(*i).contains(point))
            .map(|(_, &shape)| DeskHit::Shape(shape))
    }

    pub fn draw(&self, image: &mut RgbImage, current: Shape) {
        for (idx, color) in DESK_PALETTE.iter().enumerate() {
            let r = self.swatch(idx);
            fill_rect(image, r.left, r.top, r.right, r.bottom, color.pixel());
        }
        let caption = format!("Mode: {}", current.label());
        let caption_x = self.width / 2 - text_width(&caption, 2) / 2;
        draw_label(image, caption_x, 110, &caption, INK, 2);
        for (idx, shape) in Shape::ALL.iter().enumerate() {
            let r = self.shape_button(idx);
            fill_rect(image, r.left, r.top, r.right, r.bottom, BUTTON_GREY);
            draw_label(image, r.left + 6, r.top + 18, shape.label(), INK, 1);
        }
    }
}
