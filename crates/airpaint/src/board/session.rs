//! Board state owned by the processing loop, mutated one frame at a time.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::cooldown::Cooldown;

use super::{
    brush::Brush,
    color::PaintColor,
    gesture::{HandInput, Intent, interpret},
    layout::{BoardLayout, ButtonAction},
    strokes::{StrokeList, StrokePoint},
};

/// Tunables of the web board.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardSettings {
    pub cooldown: Duration,
    pub eraser_radius: f32,
    pub initial_thickness: u32,
    pub thickness_step: u32,
    pub thickness_floor: u32,
    pub thickness_ceiling: u32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(300),
            eraser_radius: 50.0,
            initial_thickness: 10,
            thickness_step: 2,
            thickness_floor: 2,
            thickness_ceiling: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Debounced {
    Clear,
    Button(ButtonAction),
}

#[derive(Debug)]
pub struct Session {
    pub layout: BoardLayout,
    pub settings: BoardSettings,
    pub brush: Brush,
    pub strokes: StrokeList,
    scroll_anchor: Option<i32>,
    cooldown: Cooldown<Debounced>,
    last_intent: Intent,
}

impl Session {
    pub fn new(layout: BoardLayout, settings: BoardSettings) -> Self {
        let color = layout.color(0).unwrap_or(PaintColor::RED);
        Self {
            brush: Brush::new(color, settings.initial_thickness),
            cooldown: Cooldown::new(settings.cooldown),
            strokes: StrokeList::new(),
            scroll_anchor: None,
            last_intent: Intent::Idle,
            layout,
            settings,
        }
    }

    pub fn for_frame(width: i32, height: i32) -> Self {
        Self::new(BoardLayout::for_frame(width, height), BoardSettings::default())
    }

    pub fn last_intent(&self) -> Intent {
        self.last_intent
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll_anchor.is_some()
    }

    /// Interpret one frame and apply it. Debounced actions still inside their
    /// cooldown window are reported as [`Intent::PenUp`].
    pub fn observe(&mut self, input: Option<&HandInput>, now: Instant) -> Intent {
        let intent = interpret(input, self.brush.eraser, &self.layout);
        let applied = self.apply(intent, now);
        self.last_intent = applied;
        applied
    }

    fn apply(&mut self, intent: Intent, now: Instant) -> Intent {
        if !matches!(intent, Intent::Scroll { .. }) {
            self.scroll_anchor = None;
        }
        match intent {
            Intent::Idle => return intent,
            Intent::Draw { tip } => {
                self.strokes.push_point(StrokePoint::new(
                    tip,
                    self.brush.color,
                    self.brush.thickness,
                ));
                return intent;
            }
            Intent::Scroll { tip } => self.scroll(tip.1),
            Intent::Erase { tip } => {
                let removed = self.strokes.erase_near(tip, self.settings.eraser_radius);
                if removed > 0 {
                    debug!(removed, "erased points");
                }
            }
            Intent::Clear => {
                if !self.cooldown.try_fire(Debounced::Clear, now) {
                    return self.suppressed();
                }
                self.strokes.clear();
                debug!("canvas cleared");
            }
            Intent::SelectColor { index } => {
                let action = ButtonAction::SelectColor(index);
                if !self.cooldown.try_fire(Debounced::Button(action), now) {
                    return self.suppressed();
                }
                if let Some(color) = self.layout.color(index) {
                    self.brush.select_color(color);
                    debug!(color = color.name, "colour selected");
                }
            }
            Intent::BrushIncrease => {
                let key = Debounced::Button(ButtonAction::BrushIncrease);
                if !self.cooldown.try_fire(key, now) {
                    return self.suppressed();
                }
                self.brush
                    .grow(self.settings.thickness_step, self.settings.thickness_ceiling);
                debug!(thickness = self.brush.thickness, "brush size increased");
            }
            Intent::BrushDecrease => {
                let key = Debounced::Button(ButtonAction::BrushDecrease);
                if !self.cooldown.try_fire(key, now) {
                    return self.suppressed();
                }
                self.brush
                    .shrink(self.settings.thickness_step, self.settings.thickness_floor);
                debug!(thickness = self.brush.thickness, "brush size decreased");
            }
            Intent::SelectEraser => {
                let key = Debounced::Button(ButtonAction::SelectEraser);
                if !self.cooldown.try_fire(key, now) {
                    return self.suppressed();
                }
                self.brush.eraser = true;
                debug!("eraser selected");
            }
            Intent::PenUp => {}
        }
        self.strokes.pen_up();
        intent
    }

    fn suppressed(&mut self) -> Intent {
        self.strokes.pen_up();
        Intent::PenUp
    }

    fn scroll(&mut self, y: i32) {
        match self.scroll_anchor {
            Some(anchor) => self.strokes.shift_y(y - anchor),
            None => debug!(y, "scroll started"),
        }
        self.scroll_anchor = Some(y);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BoardLayout::default(), BoardSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use hand_core::Fingers;

    use super::*;
    use crate::board::strokes::StrokeEntry;

    fn hand(bits: [u8; 5], tip: (i32, i32)) -> HandInput {
        HandInput::new(Fingers::from_bits(bits), tip)
    }

    const INDEX: [u8; 5] = [0, 1, 0, 0, 0];
    const HOVER: [u8; 5] = [0, 1, 1, 0, 0];
    const FIST: [u8; 5] = [0, 0, 0, 0, 0];

    #[test]
    fn drawing_records_points_with_brush() {
        let mut session = Session::default();
        let t0 = Instant::now();
        session.observe(Some(&hand(INDEX, (100, 100))), t0);
        session.observe(Some(&hand(INDEX, (110, 100))), t0);
        let points: Vec<_> = session.strokes.points().copied().collect();
        assert_eq!(
            points,
            vec![
                StrokePoint::new((100, 100), PaintColor::RED, 10),
                StrokePoint::new((110, 100), PaintColor::RED, 10),
            ]
        );
        assert_eq!(session.strokes.segments().count(), 1);
    }

    #[test]
    fn moving_without_drawing_lifts_the_pen() {
        let mut session = Session::default();
        let t0 = Instant::now();
        session.observe(Some(&hand(INDEX, (300, 300))), t0);
        assert_eq!(session.observe(Some(&hand(HOVER, (320, 300))), t0), Intent::PenUp);
        session.observe(Some(&hand(INDEX, (340, 300))), t0);
        assert_eq!(session.strokes.entries()[1], StrokeEntry::PenUp);
        assert_eq!(session.strokes.segments().count(), 0);
    }

    #[test]
    fn no_hand_changes_nothing() {
        let mut session = Session::default();
        let t0 = Instant::now();
        session.observe(Some(&hand(INDEX, (300, 300))), t0);
        assert_eq!(session.observe(None, t0), Intent::Idle);
        assert_eq!(session.strokes.len(), 1);
    }

    #[test]
    fn buttons_are_debounced_per_action() {
        let mut session = Session::default();
        let t0 = Instant::now();
        let plus = hand(HOVER, (550, 100));
        assert_eq!(session.observe(Some(&plus), t0), Intent::BrushIncrease);
        assert_eq!(session.brush.thickness, 12);

        let soon = t0 + Duration::from_millis(100);
        assert_eq!(session.observe(Some(&plus), soon), Intent::PenUp);
        assert_eq!(session.brush.thickness, 12);
        assert_eq!(
            session.observe(Some(&hand(HOVER, (700, 100))), soon),
            Intent::BrushDecrease
        );
        assert_eq!(session.brush.thickness, 10);

        let later = t0 + Duration::from_millis(300);
        assert_eq!(session.observe(Some(&plus), later), Intent::BrushIncrease);
        assert_eq!(session.brush.thickness, 12);
    }

    #[test]
    fn eraser_button_then_colour_swatch() {
        let mut session = Session::default();
        let t0 = Instant::now();
        session.observe(Some(&hand(INDEX, (400, 400))), t0);
        session.observe(Some(&hand(HOVER, (900, 100))), t0);
        assert!(session.brush.eraser);

        assert_eq!(
            session.observe(Some(&hand(INDEX, (410, 400))), t0),
            Intent::Erase { tip: (410, 400) }
        );
        assert_eq!(session.strokes.point_count(), 0);

        session.observe(Some(&hand(HOVER, (250, 100))), t0);
        assert!(!session.brush.eraser);
        assert_eq!(session.brush.color, PaintColor::GREEN);
    }

    #[test]
    fn clear_gesture_empties_the_list() {
        let mut session = Session::default();
        let t0 = Instant::now();
        session.observe(Some(&hand(INDEX, (400, 400))), t0);
        session.observe(Some(&hand(INDEX, (420, 400))), t0);
        assert_eq!(session.observe(Some(&hand([0, 1, 1, 1, 1], (400, 400))), t0), Intent::Clear);
        assert!(session.strokes.is_empty());
    }

    #[test]
    fn scroll_follows_the_fist() {
        let mut session = Session::default();
        let t0 = Instant::now();
        session.observe(Some(&hand(INDEX, (400, 400))), t0);
        session.observe(Some(&hand(FIST, (500, 300))), t0);
        assert!(session.is_scrolling());
        assert_eq!(session.strokes.points().next().map(|p| p.pos), Some((400, 400)));

        session.observe(Some(&hand(FIST, (500, 340))), t0);
        session.observe(Some(&hand(FIST, (500, 330))), t0);
        assert_eq!(session.strokes.points().next().map(|p| p.pos), Some((400, 430)));

        session.observe(Some(&hand(HOVER, (500, 100))), t0);
        assert!(!session.is_scrolling());
        session.observe(Some(&hand(FIST, (500, 200))), t0);
        assert_eq!(session.strokes.points().next().map(|p| p.pos), Some((400, 430)));
    }
}
