use std::collections::VecDeque;

use airpaint::desk::{ClickTrigger, DeskApp, DeskIntent, FrameWindow, MouseButton, Pointer, drive};
use anyhow::Result;
use frame_ingest::{CaptureError, Frame, FrameFormat, FrameSource};
use hand_core::{
    Fingers, FrameView, Hand, Handedness, LANDMARK_COUNT, Landmark, LandmarkProvider,
    ProviderError,
    landmarks::{
        INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, THUMB_CMC, THUMB_TIP,
    },
};
use image::RgbImage;

const W: i32 = 320;
const H: i32 = 240;

struct ScriptedSource {
    remaining: usize,
    broken: bool,
}

impl ScriptedSource {
    fn frames(remaining: usize) -> Self {
        Self {
            remaining,
            broken: false,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.remaining == 0 {
            return Err(if self.broken {
                CaptureError::Open {
                    uri: "scripted".into(),
                }
            } else {
                CaptureError::Ended {
                    uri: "scripted".into(),
                }
            });
        }
        self.remaining -= 1;
        Ok(Frame {
            data: vec![0; (W * H * 3) as usize],
            width: W,
            height: H,
            timestamp_ms: 0,
            format: FrameFormat::Bgr8,
        })
    }

    fn resolution(&self) -> (i32, i32) {
        (W, H)
    }
}

struct ScriptedHands(VecDeque<Option<Hand>>);

impl LandmarkProvider for ScriptedHands {
    fn detect(&mut self, _frame: FrameView<'_>) -> Result<Option<Hand>, ProviderError> {
        Ok(self.0.pop_front().flatten())
    }
}

#[derive(Default)]
struct CountingWindow {
    shown: Vec<(u32, u32)>,
    close_after: Option<usize>,
}

impl FrameWindow for CountingWindow {
    fn is_open(&self) -> bool {
        self.close_after.map_or(true, |limit| self.shown.len() < limit)
    }

    fn show(&mut self, image: &RgbImage) -> Result<()> {
        self.shown.push(image.dimensions());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPointer {
    moves: Vec<(i32, i32)>,
    clicks: Vec<MouseButton>,
}

impl Pointer for RecordingPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.moves.push((x, y));
        Ok(())
    }

    fn click(&mut self, button: MouseButton) -> Result<()> {
        self.clicks.push(button);
        Ok(())
    }
}

/// Thumb pointing down (mouse mode), index either straight or bent.
fn mouse_hand(bent_index: bool) -> Hand {
    let mut landmarks = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];
    landmarks[THUMB_CMC] = Landmark::new(0.45, 0.7);
    landmarks[THUMB_TIP] = Landmark::new(0.3, 0.9);
    landmarks[INDEX_MCP] = Landmark::new(0.5, 0.7);
    landmarks[INDEX_PIP] = Landmark::new(0.5, 0.6);
    landmarks[INDEX_TIP] = if bent_index {
        Landmark::new(0.52, 0.68)
    } else {
        Landmark::new(0.5, 0.4)
    };
    landmarks[MIDDLE_MCP] = Landmark::new(0.55, 0.7);
    landmarks[MIDDLE_PIP] = Landmark::new(0.55, 0.6);
    landmarks[MIDDLE_TIP] = Landmark::new(0.55, 0.5);
    let mut hand = Hand::new(landmarks, Handedness::Right);
    hand.fingers = Some(Fingers::from_bits([0, 1, 1, 0, 0]));
    hand
}

fn app(script: Vec<Option<Hand>>, trigger: ClickTrigger) -> DeskApp {
    DeskApp::new(
        Box::new(ScriptedHands(script.into())),
        (W, H),
        (1920, 1080),
        trigger,
    )
    .with_mirror(false)
}

#[test]
fn mouse_mode_moves_and_clicks_the_pointer() {
    let script = vec![
        Some(mouse_hand(false)),
        Some(mouse_hand(false)),
        Some(mouse_hand(true)),
        Some(mouse_hand(true)),
        None,
    ];
    let mut app = app(script, ClickTrigger::Edge);
    let mut source = ScriptedSource::frames(5);
    let mut window = CountingWindow::default();
    let mut pointer = RecordingPointer::default();

    let shown = drive(&mut source, &mut app, &mut window, &mut pointer).unwrap();
    assert_eq!(shown, 5);
    assert_eq!(pointer.moves, vec![(960, 432)]);
    assert_eq!(pointer.clicks, vec![MouseButton::Left]);
    assert_eq!(app.session().last_intent(), DeskIntent::Idle);
    assert!(window.shown.iter().all(|&size| size == (W as u32, H as u32)));
}

#[test]
fn closing_the_window_stops_the_loop() {
    let mut app = app(Vec::new(), ClickTrigger::Level);
    let mut source = ScriptedSource::frames(100);
    let mut window = CountingWindow {
        close_after: Some(3),
        ..Default::default()
    };
    let mut pointer = RecordingPointer::default();

    assert_eq!(
        drive(&mut source, &mut app, &mut window, &mut pointer).unwrap(),
        3
    );
    assert_eq!(source.remaining, 97);
}

#[test]
fn unreadable_frames_end_the_loop_quietly() {
    let mut app = app(Vec::new(), ClickTrigger::Level);
    let mut source = ScriptedSource {
        remaining: 2,
        broken: true,
    };
    let mut window = CountingWindow::default();
    let mut pointer = RecordingPointer::default();

    assert_eq!(
        drive(&mut source, &mut app, &mut window, &mut pointer).unwrap(),
        2
    );
    assert_eq!(window.shown.len(), 2);
}
