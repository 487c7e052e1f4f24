//! Hand readings used by the desktop painter and virtual mouse.

use hand_core::{
    Hand, Landmark, angle_deg, distance,
    landmarks::{
        INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, THUMB_CMC, THUMB_TIP,
    },
};
use serde::Serialize;

use super::ui::Shape;

/// Pinch distance (normalized units) below which the cursor follows the hand in drawing mode.
pub const PINCH_THRESHOLD: f32 = 0.1;
/// Joint angle (degrees) below which a finger counts as bent for a click.
pub const CLICK_ANGLE_DEG: f32 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Mode {
    #[default]
    Drawing,
    Mouse,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Drawing => "Drawing Mode",
            Mode::Mouse => "Virtual Mouse Mode",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickTrigger {
    /// Fire on every frame the finger stays bent.
    #[default]
    Level,
    /// Fire once per bend.
    Edge,
}

/// What the desktop loop does with a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeskIntent {
    Idle,
    SwitchMode { mode: Mode },
    StrokeStart { at: (i32, i32) },
    StrokeMove { to: (i32, i32) },
    StrokeCommit,
    Click { button: MouseButton },
    SelectColor { index: usize },
    SelectShape { shape: Shape },
    MoveCursor { to: (i32, i32) },
    Hover,
}

impl DeskIntent {
    pub fn label(&self) -> &'static str {
        match self {
            DeskIntent::Idle => "idle",
            DeskIntent::SwitchMode { .. } => "switch_mode",
            DeskIntent::StrokeStart { .. } => "stroke_start",
            DeskIntent::StrokeMove { .. } => "stroke_move",
            DeskIntent::StrokeCommit => "stroke_commit",
            DeskIntent::Click { .. } => "click",
            DeskIntent::SelectColor { .. } => "select_color",
            DeskIntent::SelectShape { .. } => "select_shape",
            DeskIntent::MoveCursor { .. } => "move_cursor",
            DeskIntent::Hover => "hover",
        }
    }
}

fn lm(hand: &Hand, index: usize) -> Landmark {
    hand.landmark(index).unwrap_or_default()
}

/// Thumb tip above its base joint selects drawing, below selects the mouse.
/// A thumb exactly level with the joint keeps `current`.
pub fn mode_for(hand: &Hand, current: Mode) -> Mode {
    let tip = lm(hand, THUMB_TIP).y;
    let base = lm(hand, THUMB_CMC).y;
    if tip < base {
        Mode::Drawing
    } else if tip > base {
        Mode::Mouse
    } else {
        current
    }
}

pub fn is_pinching(hand: &Hand) -> bool {
    distance(lm(hand, THUMB_TIP), lm(hand, INDEX_MCP)) < PINCH_THRESHOLD
}

/// Left wins when both index and middle are bent.
pub fn bent_finger(hand: &Hand) -> Option<MouseButton> {
    if angle_deg(lm(hand, INDEX_MCP), lm(hand, INDEX_PIP), lm(hand, INDEX_TIP)) < CLICK_ANGLE_DEG {
        Some(MouseButton::Left)
    } else if angle_deg(lm(hand, MIDDLE_MCP), lm(hand, MIDDLE_PIP), lm(hand, MIDDLE_TIP))
        < CLICK_ANGLE_DEG
    {
        Some(MouseButton::Right)
    } else {
        None
    }
}

/// Index tip mapped onto a `screen` of (width, height) pixels.
pub fn screen_point(hand: &Hand, screen: (i32, i32)) -> (i32, i32) {
    lm(hand, INDEX_TIP).to_pixel(screen.0, screen.1)
}

/// Turns per-frame bend readings into clicks according to the trigger mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClickLatch {
    trigger: ClickTrigger,
    held: Option<MouseButton>,
}

impl ClickLatch {
    pub fn new(trigger: ClickTrigger) -> Self {
        Self {
            trigger,
            held: None,
        }
    }

    pub fn update(&mut self, bent: Option<MouseButton>) -> Option<MouseButton> {
        let previous = std::mem::replace(&mut self.held, bent);
        match self.trigger {
            ClickTrigger::Level => bent,
            ClickTrigger::Edge if bent != previous => bent,
            ClickTrigger::Edge => None,
        }
    }

    pub fn reset(&mut self) {
        self.held = None;
    }
}
