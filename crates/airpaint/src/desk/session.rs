//! Frame-by-frame state of the desktop painter.

use std::borrow::Cow;

use hand_core::{Hand, landmarks::INDEX_TIP};
use image::RgbImage;
use tracing::debug;

use crate::board::PaintColor;

use super::{
    canvas::Canvas,
    gesture::{
        ClickLatch, ClickTrigger, DeskIntent, Mode, bent_finger, is_pinching, mode_for,
        screen_point,
    },
    ui::{DESK_PALETTE, DeskHit, DeskLayout, Shape},
};

pub const DEFAULT_THICKNESS: u32 = 5;

/// Colour, thickness and tool of the desktop brush.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeskBrush {
    pub color: PaintColor,
    pub thickness: u32,
    pub shape: Shape,
}

impl Default for DeskBrush {
    fn default() -> Self {
        Self {
            color: DESK_PALETTE[0],
            thickness: DEFAULT_THICKNESS,
            shape: Shape::default(),
        }
    }
}

/// A stroke between finger-down and lift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveStroke {
    pub start: (i32, i32),
    pub last: (i32, i32),
}

#[derive(Debug)]
pub struct DeskSession {
    pub layout: DeskLayout,
    pub canvas: Canvas,
    pub brush: DeskBrush,
    mode: Mode,
    stroke: Option<ActiveStroke>,
    clicks: ClickLatch,
    screen: (i32, i32),
    last_intent: DeskIntent,
}

impl DeskSession {
    pub fn new(width: i32, height: i32, screen: (i32, i32), trigger: ClickTrigger) -> Self {
        Self {
            layout: DeskLayout::new(width, height),
            canvas: Canvas::new(width.max(1) as u32, height.max(1) as u32),
            brush: DeskBrush::default(),
            mode: Mode::default(),
            stroke: None,
            clicks: ClickLatch::new(trigger),
            screen,
            last_intent: DeskIntent::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn stroke(&self) -> Option<ActiveStroke> {
        self.stroke
    }

    pub fn last_intent(&self) -> DeskIntent {
        self.last_intent
    }

    /// Interpret one frame and apply its effect on the canvas and brush.
    /// Pointer effects (`MoveCursor`, `Click`) are left to the caller.
    pub fn observe(&mut self, hand: Option<&Hand>) -> DeskIntent {
        let intent = self.interpret(hand);
        self.last_intent = intent;
        intent
    }

    fn interpret(&mut self, hand: Option<&Hand>) -> DeskIntent {
        let Some(hand) = hand.filter(|hand| hand.is_complete()) else {
            self.commit_stroke();
            self.clicks.reset();
            return DeskIntent::Idle;
        };
        let Some(tip) = hand.pixel(INDEX_TIP, self.layout.width, self.layout.height) else {
            return DeskIntent::Idle;
        };

        let mode = mode_for(hand, self.mode);
        if mode != self.mode {
            self.commit_stroke();
            self.clicks.reset();
            self.mode = mode;
            debug!(mode = mode.label(), "mode switched");
            return DeskIntent::SwitchMode { mode };
        }

        let fingers = hand.fingers();
        match self.mode {
            Mode::Drawing => {
                if fingers.index() && !fingers.middle() {
                    return self.extend_stroke(tip);
                }
                if fingers.index() && fingers.middle() && self.stroke.is_some() {
                    self.commit_stroke();
                    return DeskIntent::StrokeCommit;
                }
            }
            Mode::Mouse => {
                if let Some(button) = self.clicks.update(bent_finger(hand)) {
                    return DeskIntent::Click { button };
                }
            }
        }

        if let Some(hit) = self.layout.hit(tip) {
            return self.select(hit);
        }

        match self.mode {
            Mode::Drawing if is_pinching(hand) => DeskIntent::MoveCursor {
                to: screen_point(hand, self.screen),
            },
            Mode::Drawing => DeskIntent::Hover,
            Mode::Mouse => DeskIntent::MoveCursor {
                to: screen_point(hand, self.screen),
            },
        }
    }

    fn extend_stroke(&mut self, tip: (i32, i32)) -> DeskIntent {
        let brush = self.brush;
        match &mut self.stroke {
            Some(stroke) => {
                if brush.shape.is_continuous() {
                    self.canvas.stroke(
                        brush.shape,
                        stroke.last,
                        tip,
                        brush.color.pixel(),
                        brush.thickness,
                    );
                }
                stroke.last = tip;
                DeskIntent::StrokeMove { to: tip }
            }
            None => {
                self.stroke = Some(ActiveStroke {
                    start: tip,
                    last: tip,
                });
                DeskIntent::StrokeStart { at: tip }
            }
        }
    }

    /// Paint the pending outline shape, if any, and end the stroke.
    fn commit_stroke(&mut self) {
        let Some(stroke) = self.stroke.take() else {
            return;
        };
        let brush = self.brush;
        if !brush.shape.is_continuous() {
            self.canvas.commit(
                brush.shape,
                stroke.start,
                stroke.last,
                brush.color.pixel(),
                brush.thickness,
            );
        }
        debug!(shape = brush.shape.label(), "stroke committed");
    }

    fn select(&mut self, hit: DeskHit) -> DeskIntent {
        match hit {
            DeskHit::Color(index) => {
                self.brush.color = DESK_PALETTE[index];
                DeskIntent::SelectColor { index }
            }
            DeskHit::Shape(shape) => {
                if shape != self.brush.shape {
                    self.commit_stroke();
                    self.brush.shape = shape;
                }
                DeskIntent::SelectShape { shape }
            }
        }
    }

    /// Canvas as it should be shown this frame, including any rubber-band preview.
    pub fn canvas_view(&self) -> Cow<'_, RgbImage> {
        let brush = self.brush;
        match self.stroke {
            Some(stroke) if !brush.shape.is_continuous() => Cow::Owned(self.canvas.with_preview(
                brush.shape,
                stroke.start,
                stroke.last,
                brush.color.pixel(),
                brush.thickness,
            )),
            _ => Cow::Borrowed(self.canvas.image()),
        }
    }
}

#[cfg(test)]
mod tests {
    use hand_core::{
        Fingers, Handedness, LANDMARK_COUNT, Landmark,
        landmarks::{INDEX_MCP, INDEX_PIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, THUMB_CMC, THUMB_TIP},
    };
    use image::Rgb;

    use super::*;
    use crate::desk::{canvas::PAPER, gesture::MouseButton};

    const INDEX: [u8; 5] = [1, 1, 0, 0, 0];
    const TWO: [u8; 5] = [1, 1, 1, 0, 0];
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    fn hand(tip: (f32, f32), fingers: [u8; 5], thumb_up: bool) -> Hand {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        landmarks[THUMB_CMC] = Landmark::new(0.45, 0.7);
        landmarks[THUMB_TIP] = Landmark::new(0.3, if thumb_up { 0.5 } else { 0.9 });
        landmarks[INDEX_MCP] = Landmark::new(0.5, 0.7);
        landmarks[INDEX_PIP] = Landmark::new(0.5, 0.6);
        landmarks[INDEX_TIP] = Landmark::new(tip.0, tip.1);
        landmarks[MIDDLE_MCP] = Landmark::new(0.55, 0.7);
        landmarks[MIDDLE_PIP] = Landmark::new(0.55, 0.6);
        landmarks[MIDDLE_TIP] = Landmark::new(0.55, 0.5);
        let mut hand = Hand::new(landmarks, Handedness::Right);
        hand.fingers = Some(Fingers::from_bits(fingers));
        hand
    }

    fn session(trigger: ClickTrigger) -> DeskSession {
        DeskSession::new(1280, 720, (1920, 1080), trigger)
    }

    #[test]
    fn only_a_mode_change_consumes_the_frame() {
        let mut desk = session(ClickTrigger::Level);
        assert_eq!(desk.observe(Some(&hand((0.5, 0.3), TWO, true))), DeskIntent::Hover);
        assert_eq!(
            desk.observe(Some(&hand((0.5, 0.3), TWO, false))),
            DeskIntent::SwitchMode { mode: Mode::Mouse }
        );
        assert_eq!(
            desk.observe(Some(&hand((0.5, 0.3), TWO, false))),
            DeskIntent::MoveCursor { to: (960, 324) }
        );
        assert_eq!(desk.mode(), Mode::Mouse);
    }

    #[test]
    fn line_previews_then_commits_on_lift() {
        let mut desk = session(ClickTrigger::Level);
        assert_eq!(
            desk.observe(Some(&hand((0.25, 0.5), INDEX, true))),
            DeskIntent::StrokeStart { at: (320, 360) }
        );
        assert_eq!(
            desk.observe(Some(&hand((0.5, 0.5), INDEX, true))),
            DeskIntent::StrokeMove { to: (640, 360) }
        );
        assert_eq!(*desk.canvas.image().get_pixel(480, 360), PAPER);
        assert_eq!(*desk.canvas_view().get_pixel(480, 360), BLUE);

        assert_eq!(
            desk.observe(Some(&hand((0.5, 0.5), TWO, true))),
            DeskIntent::StrokeCommit
        );
        assert!(desk.stroke().is_none());
        assert_eq!(*desk.canvas.image().get_pixel(480, 360), BLUE);
    }

    #[test]
    fn freestyle_paints_while_moving() {
        let mut desk = session(ClickTrigger::Level);
        desk.brush.shape = Shape::Freestyle;
        desk.observe(Some(&hand((0.25, 0.5), INDEX, true)));
        desk.observe(Some(&hand((0.5, 0.5), INDEX, true)));
        assert_eq!(*desk.canvas.image().get_pixel(480, 360), BLUE);
    }

    #[test]
    fn losing_the_hand_commits_the_shape() {
        let mut desk = session(ClickTrigger::Level);
        desk.brush.shape = Shape::Rectangle;
        desk.observe(Some(&hand((0.25, 0.25), INDEX, true)));
        desk.observe(Some(&hand((0.5, 0.5), INDEX, true)));
        assert_eq!(desk.observe(None), DeskIntent::Idle);
        assert!(desk.stroke().is_none());
        assert_eq!(*desk.canvas.image().get_pixel(400, 180), BLUE);
        assert_eq!(*desk.canvas.image().get_pixel(400, 300), PAPER);
    }

    #[test]
    fn switching_to_mouse_commits_the_shape() {
        let mut desk = session(ClickTrigger::Level);
        desk.brush.shape = Shape::Rectangle;
        desk.observe(Some(&hand((0.25, 0.25), INDEX, true)));
        desk.observe(Some(&hand((0.5, 0.5), INDEX, true)));
        assert_eq!(*desk.canvas.image().get_pixel(400, 180), PAPER);

        assert_eq!(
            desk.observe(Some(&hand((0.5, 0.5), INDEX, false))),
            DeskIntent::SwitchMode { mode: Mode::Mouse }
        );
        assert!(desk.stroke().is_none());
        assert_eq!(*desk.canvas.image().get_pixel(400, 180), BLUE);
        assert_eq!(*desk.canvas.image().get_pixel(400, 300), PAPER);

        desk.observe(Some(&hand((0.5, 0.5), INDEX, true)));
        assert!(desk.stroke().is_none());
    }

    #[test]
    fn bent_index_clicks_per_trigger_mode() {
        let bent = |desk: &mut DeskSession| desk.observe(Some(&hand((0.52, 0.68), TWO, false)));
        let left = DeskIntent::Click {
            button: MouseButton::Left,
        };

        let mut level = session(ClickTrigger::Level);
        bent(&mut level);
        assert_eq!(bent(&mut level), left);
        assert_eq!(bent(&mut level), left);

        let mut edge = session(ClickTrigger::Edge);
        bent(&mut edge);
        assert_eq!(bent(&mut edge), left);
        assert!(matches!(bent(&mut edge), DeskIntent::MoveCursor { .. }));
    }

    #[test]
    fn hovering_the_palette_picks_a_colour() {
        let mut desk = session(ClickTrigger::Level);
        let swatch = (500.0 / 1280.0, 55.0 / 720.0);
        assert_eq!(
            desk.observe(Some(&hand(swatch, TWO, true))),
            DeskIntent::SelectColor { index: 2 }
        );
        assert_eq!(desk.brush.color, PaintColor::RED);

        let circle = (600.0 / 1280.0, 660.0 / 720.0);
        assert_eq!(
            desk.observe(Some(&hand(circle, TWO, true))),
            DeskIntent::SelectShape {
                shape: Shape::Circle
            }
        );
        assert_eq!(desk.brush.shape, Shape::Circle);
    }

    #[test]
    fn pinch_moves_the_cursor_in_drawing_mode() {
        let mut desk = session(ClickTrigger::Level);
        let mut pinch = hand((0.5, 0.3), TWO, true);
        pinch.landmarks[THUMB_TIP] = Landmark::new(0.5, 0.65);
        assert_eq!(
            desk.observe(Some(&pinch)),
            DeskIntent::MoveCursor { to: (960, 324) }
        );
    }
}
