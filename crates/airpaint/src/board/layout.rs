//! Button geometry of the web board.

use serde::Serialize;

use super::color::{BOARD_PALETTE, PaintColor};

/// Frame size the default layout was designed for.
pub const REFERENCE_SIZE: (i32, i32) = (1280, 720);

/// Axis-aligned rectangle, `left < right` and `top < bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Open-interval test: points on an edge are outside.
    pub fn contains(&self, (x, y): (i32, i32)) -> bool {
        self.left < x && x < self.right && self.top < y && y < self.bottom
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::new(
            (self.left as f32 * sx).round() as i32,
            (self.top as f32 * sy).round() as i32,
            (self.right as f32 * sx).round() as i32,
            (self.bottom as f32 * sy).round() as i32,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ButtonAction {
    SelectColor(usize),
    BrushIncrease,
    BrushDecrease,
    SelectEraser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Button {
    pub rect: Rect,
    pub action: ButtonAction,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardLayout {
    pub palette: Vec<PaintColor>,
    pub buttons: Vec<Button>,
    /// Centre of the active-colour indicator circle.
    pub indicator: (i32, i32),
}

impl Default for BoardLayout {
    fn default() -> Self {
        let mut buttons: Vec<Button> = BOARD_PALETTE
            .iter()
            .enumerate()
            .map(|(idx, color)| {
                let left = 50 + 150 * idx as i32;
                Button {
                    rect: Rect::new(left, 50, left + 100, 150),
                    action: ButtonAction::SelectColor(idx),
                    label: color.name,
                }
            })
            .collect();
        buttons.push(Button {
            rect: Rect::new(500, 50, 600, 150),
            action: ButtonAction::BrushIncrease,
            label: "+ Size",
        });
        buttons.push(Button {
            rect: Rect::new(650, 50, 750, 150),
            action: ButtonAction::BrushDecrease,
            label: "- Size",
        });
        buttons.push(Button {
            rect: Rect::new(800, 50, 950, 150),
            action: ButtonAction::SelectEraser,
            label: "Eraser",
        });
        Self {
            palette: BOARD_PALETTE.to_vec(),
            buttons,
            indicator: (1050, 250),
        }
    }
}

impl BoardLayout {
    /// Default layout stretched to a frame of `width` x `height`.
    pub fn for_frame(width: i32, height: i32) -> Self {
        let layout = Self::default();
        if (width, height) == REFERENCE_SIZE {
            return layout;
        }
        let sx = width as f32 / REFERENCE_SIZE.0 as f32;
        let sy = height as f32 / REFERENCE_SIZE.1 as f32;
        Self {
            buttons: layout
                .buttons
                .iter()
                .map(|button| Button {
                    rect: button.rect.scaled(sx, sy),
                    ..*button
                })
                .collect(),
            indicator: (
                (layout.indicator.0 as f32 * sx).round() as i32,
                (layout.indicator.1 as f32 * sy).round() as i32,
            ),
            palette: layout.palette,
        }
    }

    /// First button whose interior contains `point`.
    pub fn hit(&self, point: (i32, i32)) -> Option<ButtonAction> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(point))
            .map(|button| button.action)
    }

    pub fn color(&self, index: usize) -> Option<PaintColor> {
        self.palette.get(index).copied()
    }
}
