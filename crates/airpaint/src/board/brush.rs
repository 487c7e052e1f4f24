use serde::Serialize;

use super::color::PaintColor;

/// Active brush of the web board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Brush {
    pub color: PaintColor,
    pub thickness: u32,
    pub eraser: bool,
}

impl Brush {
    pub fn new(color: PaintColor, thickness: u32) -> Self {
        Self {
            color,
            thickness,
            eraser: false,
        }
    }

    pub fn select_color(&mut self, color: PaintColor) {
        self.color = color;
        self.eraser = false;
    }

    pub fn grow(&mut self, step: u32, ceiling: u32) {
        self.thickness = self.thickness.saturating_add(step).min(ceiling);
    }

    pub fn shrink(&mut self, step: u32, floor: u32) {
        self.thickness = self.thickness.saturating_sub(step).max(floor);
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(PaintColor::RED, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_stays_within_bounds() {
        let mut brush = Brush::default();
        for _ in 0..20 {
            brush.shrink(2, 2);
        }
        assert_eq!(brush.thickness, 2);
        for _ in 0..100 {
            brush.grow(2, 100);
        }
        assert_eq!(brush.thickness, 100);
    }

    #[test]
    fn picking_a_colour_leaves_eraser_mode() {
        let mut brush = Brush::default();
        brush.eraser = true;
        brush.select_color(PaintColor::BLUE);
        assert!(!brush.eraser);
        assert_eq!(brush.color, PaintColor::BLUE);
    }
}
