use std::sync::Arc;

use actix_web::web::Bytes;
use serde::Serialize;
use tokio::sync::watch;

use crate::board::Session;

/// Board state shown next to each published frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub color: &'static str,
    pub thickness: u32,
    pub eraser: bool,
    pub stroke_points: usize,
    pub intent: &'static str,
}

impl SessionStatus {
    pub fn of(session: &Session) -> Self {
        Self {
            color: session.brush.color.name,
            thickness: session.brush.thickness,
            eraser: session.brush.eraser,
            stroke_points: session.strokes.point_count(),
            intent: session.last_intent().label(),
        }
    }
}

/// One encoded output frame.
#[derive(Clone, Debug)]
pub struct FramePacket {
    pub jpeg: Bytes,
    pub frame_number: u64,
    pub timestamp_ms: i64,
    pub fps: f32,
    pub status: SessionStatus,
}

#[derive(Serialize)]
pub struct StatusResponse<'a> {
    pub frame_number: u64,
    pub timestamp_ms: i64,
    pub fps: f32,
    #[serde(flatten)]
    pub status: &'a SessionStatus,
}

impl<'a> From<&'a FramePacket> for StatusResponse<'a> {
    fn from(packet: &'a FramePacket) -> Self {
        Self {
            frame_number: packet.frame_number,
            timestamp_ms: packet.timestamp_ms,
            fps: packet.fps,
            status: &packet.status,
        }
    }
}

/// Single-slot latest-frame channel between the producer and HTTP handlers.
///
/// Publishing overwrites whatever was there; readers only ever see the newest
/// frame. The sender lives as long as any clone of the sink, so subscribers
/// never observe a closed channel while the server runs.
#[derive(Clone, Debug)]
pub struct FrameSink {
    tx: Arc<watch::Sender<Option<FramePacket>>>,
}

impl FrameSink {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, packet: FramePacket) {
        self.tx.send_replace(Some(packet));
    }

    pub fn latest(&self) -> Option<FramePacket> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<FramePacket>> {
        self.tx.subscribe()
    }
}

impl Default for FrameSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(frame_number: u64) -> FramePacket {
        FramePacket {
            jpeg: Bytes::from_static(b"\xff\xd8jpeg\xff\xd9"),
            frame_number,
            timestamp_ms: 1_700_000_000_000,
            fps: 30.0,
            status: SessionStatus::of(&Session::default()),
        }
    }

    #[test]
    fn publish_overwrites_previous_frame() {
        let sink = FrameSink::new();
        assert!(sink.latest().is_none());
        sink.publish(packet(1));
        sink.publish(packet(2));
        assert_eq!(sink.latest().map(|p| p.frame_number), Some(2));
    }

    #[test]
    fn subscribers_see_new_frames() {
        let sink = FrameSink::new();
        let mut rx = sink.subscribe();
        assert!(!rx.has_changed().unwrap());
        sink.publish(packet(7));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().map(|p| p.frame_number), Some(7));
    }

    #[test]
    fn status_json_is_flat() {
        let packet = packet(3);
        let json = serde_json::to_value(StatusResponse::from(&packet)).unwrap();
        assert_eq!(json["frame_number"], 3);
        assert_eq!(json["color"], "Red");
        assert_eq!(json["thickness"], 10);
        assert_eq!(json["eraser"], false);
        assert_eq!(json["intent"], "idle");
    }
}
