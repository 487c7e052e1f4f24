//! Per-frame gesture interpretation for the web board.

use hand_core::{Fingers, Hand, landmarks::INDEX_TIP};
use serde::Serialize;

use super::layout::{BoardLayout, ButtonAction};

/// What the hand asks for in a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// No hand in view.
    Idle,
    /// Fist: drag the drawing vertically with the index tip.
    Scroll { tip: (i32, i32) },
    Clear,
    Draw { tip: (i32, i32) },
    Erase { tip: (i32, i32) },
    SelectColor { index: usize },
    BrushIncrease,
    BrushDecrease,
    SelectEraser,
    /// Hand present but not drawing.
    PenUp,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Idle => "idle",
            Intent::Scroll { .. } => "scroll",
            Intent::Clear => "clear",
            Intent::Draw { .. } => "draw",
            Intent::Erase { .. } => "erase",
            Intent::SelectColor { .. } => "select_color",
            Intent::BrushIncrease => "brush_increase",
            Intent::BrushDecrease => "brush_decrease",
            Intent::SelectEraser => "select_eraser",
            Intent::PenUp => "pen_up",
        }
    }
}

impl From<ButtonAction> for Intent {
    fn from(action: ButtonAction) -> Self {
        match action {
            ButtonAction::SelectColor(index) => Intent::SelectColor { index },
            ButtonAction::BrushIncrease => Intent::BrushIncrease,
            ButtonAction::BrushDecrease => Intent::BrushDecrease,
            ButtonAction::SelectEraser => Intent::SelectEraser,
        }
    }
}

/// The two facts the board reads from a hand: finger posture and index tip in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandInput {
    pub fingers: Fingers,
    pub tip: (i32, i32),
}

impl HandInput {
    pub fn new(fingers: Fingers, tip: (i32, i32)) -> Self {
        Self { fingers, tip }
    }

    /// `None` for hands missing landmarks.
    pub fn from_hand(hand: &Hand, width: i32, height: i32) -> Option<Self> {
        if !hand.is_complete() {
            return None;
        }
        let tip = hand.pixel(INDEX_TIP, width, height)?;
        Some(Self::new(hand.fingers(), tip))
    }
}

/// Pick exactly one intent for the frame. Postures win over drawing, drawing
/// wins over buttons.
pub fn interpret(input: Option<&HandInput>, eraser: bool, layout: &BoardLayout) -> Intent {
    let Some(input) = input else {
        return Intent::Idle;
    };
    let tip = input.tip;
    if input.fingers == Fingers::FIST {
        return Intent::Scroll { tip };
    }
    if input.fingers == Fingers::OPEN_NO_THUMB {
        return Intent::Clear;
    }
    if input.fingers.index() && !input.fingers.middle() {
        return if eraser {
            Intent::Erase { tip }
        } else {
            Intent::Draw { tip }
        };
    }
    match layout.hit(tip) {
        Some(action) => action.into(),
        None => Intent::PenUp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(bits: [u8; 5], tip: (i32, i32)) -> HandInput {
        HandInput::new(Fingers::from_bits(bits), tip)
    }

    #[test]
    fn postures_take_priority() {
        let layout = BoardLayout::default();
        assert_eq!(
            interpret(Some(&input([0, 0, 0, 0, 0], (100, 100))), false, &layout),
            Intent::Scroll { tip: (100, 100) }
        );
        assert_eq!(
            interpret(Some(&input([0, 1, 1, 1, 1], (550, 100))), false, &layout),
            Intent::Clear
        );
    }

    #[test]
    fn index_only_draws_or_erases() {
        let layout = BoardLayout::default();
        let hand = input([0, 1, 0, 0, 0], (640, 400));
        assert_eq!(
            interpret(Some(&hand), false, &layout),
            Intent::Draw { tip: (640, 400) }
        );
        assert_eq!(
            interpret(Some(&hand), true, &layout),
            Intent::Erase { tip: (640, 400) }
        );
        let thumb_too = input([1, 1, 0, 0, 0], (640, 400));
        assert_eq!(
            interpret(Some(&thumb_too), false, &layout),
            Intent::Draw { tip: (640, 400) }
        );
    }

    #[test]
    fn buttons_fire_when_not_drawing() {
        let layout = BoardLayout::default();
        let hover = |tip| interpret(Some(&input([0, 1, 1, 0, 0], tip)), false, &layout);
        assert_eq!(hover((250, 100)), Intent::SelectColor { index: 1 });
        assert_eq!(hover((550, 100)), Intent::BrushIncrease);
        assert_eq!(hover((700, 100)), Intent::BrushDecrease);
        assert_eq!(hover((900, 100)), Intent::SelectEraser);
        assert_eq!(hover((640, 400)), Intent::PenUp);
    }

    #[test]
    fn no_hand_is_idle() {
        assert_eq!(interpret(None, false, &BoardLayout::default()), Intent::Idle);
    }

    #[test]
    fn incomplete_hands_are_ignored() {
        let hand = Hand::new(vec![hand_core::Landmark::new(0.5, 0.5); 5], Default::default());
        assert_eq!(HandInput::from_hand(&hand, 640, 480), None);
    }
}
