//! Compositing of the web board onto the camera frame.

use hand_core::{Hand, landmarks::HAND_CONNECTIONS};
use image::{Rgb, RgbImage};

use crate::raster::{GLYPH_HEIGHT, draw_label, draw_line, fill_circle, fill_rect, text_width};

use super::{
    layout::{BoardLayout, ButtonAction},
    session::Session,
};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const BONE: Rgb<u8> = Rgb([255, 255, 255]);
const JOINT: Rgb<u8> = Rgb([255, 0, 0]);

const LABEL_SCALE: u32 = 2;

/// Draw chrome, strokes, brush indicator and (when present) the hand skeleton.
pub fn render_board(image: &mut RgbImage, session: &Session, hand: Option<&Hand>) {
    draw_chrome(image, &session.layout);
    draw_strokes(image, session);
    draw_indicator(image, session);
    if let Some(hand) = hand {
        draw_skeleton(image, hand);
    }
}

fn draw_chrome(image: &mut RgbImage, layout: &BoardLayout) {
    for button in &layout.buttons {
        let r = button.rect;
        match button.action {
            ButtonAction::SelectColor(idx) => {
                let Some(color) = layout.color(idx) else {
                    continue;
                };
                fill_rect(image, r.left, r.top, r.right, r.bottom, color.pixel());
                draw_label(image, r.left + 10, r.bottom + 20, button.label, color.pixel(), LABEL_SCALE);
            }
            ButtonAction::BrushIncrease | ButtonAction::BrushDecrease | ButtonAction::SelectEraser => {
                let fill = if button.action == ButtonAction::SelectEraser {
                    WHITE
                } else {
                    YELLOW
                };
                fill_rect(image, r.left, r.top, r.right, r.bottom, fill);
                let x = r.left + (r.width() - text_width(button.label, LABEL_SCALE)) / 2;
                let y = r.top + (r.height() - GLYPH_HEIGHT * LABEL_SCALE as i32) / 2;
                draw_label(image, x, y, button.label, BLACK, LABEL_SCALE);
            }
        }
    }
}

fn draw_strokes(image: &mut RgbImage, session: &Session) {
    for (from, to) in session.strokes.segments() {
        draw_line(image, from.pos, to.pos, from.color.pixel(), from.thickness);
    }
}

fn draw_indicator(image: &mut RgbImage, session: &Session) {
    let brush = session.brush;
    let (cx, cy) = session.layout.indicator;
    fill_circle(image, (cx, cy), brush.thickness as i32, brush.color.pixel());
    let text_y = cy + 90;
    draw_label(image, cx - 250, text_y, "Active Color", WHITE, LABEL_SCALE);
    draw_label(
        image,
        cx - 50,
        text_y,
        &format!("BRUSH SIZE: {}", brush.thickness),
        WHITE,
        LABEL_SCALE,
    );
    if brush.eraser {
        draw_label(image, cx - 50, text_y + 30, "ERASER", WHITE, LABEL_SCALE);
    }
}

/// Bones and joints of a detected hand, scaled to the image.
pub fn draw_skeleton(image: &mut RgbImage, hand: &Hand) {
    if !hand.is_complete() {
        return;
    }
    let (w, h) = (image.width() as i32, image.height() as i32);
    for &(a, b) in HAND_CONNECTIONS.iter() {
        if let (Some(pa), Some(pb)) = (hand.pixel(a, w, h), hand.pixel(b, w, h)) {
            draw_line(image, pa, pb, BONE, 2);
        }
    }
    for landmark in &hand.landmarks {
        fill_circle(image, landmark.to_pixel(w, h), 4, JOINT);
    }
}
