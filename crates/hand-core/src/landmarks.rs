//! Hand landmark model: 21 points per hand in the MediaPipe ordering.

use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Tip landmark of each digit, thumb first.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Bones drawn when overlaying the hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

/// Normalized landmark: `x`/`y` in `[0, 1]` of the analysed image, `z` relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Map to pixel coordinates of a `width` x `height` image. Coordinates
    /// outside `0..1` (or not finite) land on the nearest border pixel.
    pub fn to_pixel(self, width: i32, height: i32) -> (i32, i32) {
        (scale_clamped(self.x, width), scale_clamped(self.y, height))
    }
}

fn scale_clamped(v: f32, extent: i32) -> i32 {
    // `as` saturates and maps NaN to 0.
    ((v * extent as f32) as i32).clamp(0, (extent - 1).max(0))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("left") {
            Handedness::Left
        } else {
            Handedness::Right
        }
    }
}

/// Up/down state per digit, `[thumb, index, middle, ring, pinky]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fingers(pub [bool; 5]);

impl Fingers {
    pub const FIST: Fingers = Fingers([false; 5]);
    /// Four fingers up with the thumb tucked.
    pub const OPEN_NO_THUMB: Fingers = Fingers([false, true, true, true, true]);

    pub fn from_bits(bits: [u8; 5]) -> Self {
        Fingers(bits.map(|b| b != 0))
    }

    pub fn bits(self) -> [u8; 5] {
        self.0.map(u8::from)
    }

    pub fn thumb(self) -> bool {
        self.0[0]
    }

    pub fn index(self) -> bool {
        self.0[1]
    }

    pub fn middle(self) -> bool {
        self.0[2]
    }

    pub fn ring(self) -> bool {
        self.0[3]
    }

    pub fn pinky(self) -> bool {
        self.0[4]
    }
}

/// A single detected hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
    pub handedness: Handedness,
    /// Finger flags computed by the provider, when it supplies them.
    pub fingers: Option<Fingers>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness,
            fingers: None,
        }
    }

    /// True when all 21 landmarks are present; gesture logic only runs on complete hands.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }

    pub fn landmark(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }

    pub fn pixel(&self, index: usize, width: i32, height: i32) -> Option<(i32, i32)> {
        self.landmark(index).map(|lm| lm.to_pixel(width, height))
    }

    /// Finger flags, either as supplied by the provider or derived from the landmarks.
    ///
    /// Derivation: the thumb is up when its tip lies outward of the IP joint
    /// along x (direction depends on handedness); the other fingers are up when
    /// the tip is above (smaller y than) the PIP joint.
    pub fn fingers(&self) -> Fingers {
        if let Some(fingers) = self.fingers {
            return fingers;
        }
        if !self.is_complete() {
            return Fingers::default();
        }
        let lm = &self.landmarks;
        let thumb = match self.handedness {
            Handedness::Right => lm[THUMB_TIP].x > lm[THUMB_IP].x,
            Handedness::Left => lm[THUMB_TIP].x < lm[THUMB_IP].x,
        };
        let mut state = [thumb, false, false, false, false];
        for (slot, &tip) in FINGERTIPS.iter().enumerate().skip(1) {
            state[slot] = lm[tip].y < lm[tip - 2].y;
        }
        Fingers(state)
    }
}
