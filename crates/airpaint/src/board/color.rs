use image::Rgb;
use serde::Serialize;

/// A named paint colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaintColor {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

impl PaintColor {
    pub const RED: PaintColor = PaintColor::new("Red", [255, 0, 0]);
    pub const GREEN: PaintColor = PaintColor::new("Green", [0, 255, 0]);
    pub const BLUE: PaintColor = PaintColor::new("Blue", [0, 0, 255]);
    pub const YELLOW: PaintColor = PaintColor::new("Yellow", [255, 255, 0]);
    pub const CYAN: PaintColor = PaintColor::new("Cyan", [0, 255, 255]);
    pub const AZURE: PaintColor = PaintColor::new("Azure", [0, 165, 255]);
    pub const WHITE: PaintColor = PaintColor::new("White", [255, 255, 255]);
    pub const PURPLE: PaintColor = PaintColor::new("Purple", [128, 0, 128]);
    pub const BLACK: PaintColor = PaintColor::new("Black", [0, 0, 0]);

    pub const fn new(name: &'static str, rgb: [u8; 3]) -> Self {
        Self { name, rgb }
    }

    pub fn pixel(self) -> Rgb<u8> {
        Rgb(self.rgb)
    }
}

/// Swatches offered by the web board, left to right.
pub const BOARD_PALETTE: [PaintColor; 3] = [PaintColor::RED, PaintColor::GREEN, PaintColor::BLUE];
