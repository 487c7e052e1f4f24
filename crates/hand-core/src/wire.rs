//! JSON-lines detection format shared by the sidecar and replay providers.
//!
//! One line per frame:
//! `{"hands":[{"landmarks":[[x,y,z],...],"handedness":"Right","fingers":[0,1,0,0,0]}]}`

use serde::{Deserialize, Serialize};

use crate::{
    landmarks::{Fingers, Hand, Handedness, Landmark},
    provider::ProviderError,
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DetectionLine {
    #[serde(default)]
    pub hands: Vec<WireHand>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireHand {
    pub landmarks: Vec<WirePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingers: Option<[u8; 5]>,
}

/// `[x, y]` or `[x, y, z]`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WirePoint {
    Xyz([f32; 3]),
    Xy([f32; 2]),
}

impl From<&WirePoint> for Landmark {
    fn from(point: &WirePoint) -> Self {
        match *point {
            WirePoint::Xyz([x, y, z]) => Landmark { x, y, z },
            WirePoint::Xy([x, y]) => Landmark::new(x, y),
        }
    }
}

impl From<&WireHand> for Hand {
    fn from(wire: &WireHand) -> Self {
        Hand {
            landmarks: wire.landmarks.iter().map(Landmark::from).collect(),
            handedness: wire
                .handedness
                .as_deref()
                .map(Handedness::from_label)
                .unwrap_or_default(),
            fingers: wire.fingers.map(Fingers::from_bits),
        }
    }
}

/// Parse one detection line and keep the first hand. Blank lines mean no hand.
pub fn parse_detection_line(line: &str) -> Result<Option<Hand>, ProviderError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed: DetectionLine = serde_json::from_str(trimmed)?;
    Ok(parsed.hands.first().map(Hand::from))
}
