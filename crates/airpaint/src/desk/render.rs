use anyhow::Result;
use hand_core::Hand;
use image::{Rgb, RgbImage};

use crate::{
    board::draw_skeleton,
    raster::{blend_into, draw_label},
};

use super::{
    gesture::{DeskIntent, Mode, MouseButton},
    session::DeskSession,
};

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Draw the buttons, hand and status onto the camera frame, then mix in the canvas 50/50.
pub fn compose(frame: &mut RgbImage, session: &DeskSession, hand: Option<&Hand>) -> Result<()> {
    session.layout.draw(frame, session.brush.shape);
    if let Some(hand) = hand {
        draw_skeleton(frame, hand);
    }

    let mode = session.mode();
    let mode_color = match mode {
        Mode::Drawing => GREEN,
        Mode::Mouse => RED,
    };
    draw_label(frame, 50, 40, mode.label(), mode_color, 2);
    if let DeskIntent::Click { button } = session.last_intent() {
        let (text, color) = match button {
            MouseButton::Left => ("Left Click", GREEN),
            MouseButton::Right => ("Right Click", RED),
        };
        draw_label(frame, 50, 70, text, color, 2);
    }

    blend_into(frame, &session.canvas_view(), 0.5)
}
