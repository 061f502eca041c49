//! Wire types for the Pong match host
//!
//! Frames for the drawing surface use postcard; everything that crosses the
//! persistence boundary or the match socket is JSON.

use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};

pub mod records;
pub mod socket;

pub use records::*;
pub use socket::*;

#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    #[error("frame codec: {0}")]
    Frame(#[from] postcard::Error),
    #[error("json codec: {0}")]
    Json(#[from] serde_json::Error),
    #[error("a score submission needs 2 or 4 scores, got {0}")]
    ScoreCount(usize),
}

// ============================================================================
// Frame messages (host to drawing surface)
// ============================================================================

/// Axis-aligned box, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    Wall,
    Ice,
    Potion,
    Speed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleView {
    pub seat: u8,
    pub rect: Rect,
    pub frozen: bool,
    pub inverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusView {
    pub kind: PowerUp,
    pub rect: Rect,
}

/// Everything the surface needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub paused: bool,
    pub field: Rect,
    pub ball: Rect,
    pub paddles: Vec<PaddleView>,
    pub bonuses: Vec<BonusView>,
    pub walls: Vec<Rect>,
    pub scores: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum S2C {
    /// Sent every display refresh, paused frames included
    Frame(FrameSnapshot),

    /// Final frame of a match
    GameOver {
        winner_seat: u8,
        winner_alias: String,
        scores: Vec<u32>,
    },
}

impl S2C {
    /// Serialize S2C message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(to_allocvec(self)?)
    }

    /// Deserialize S2C message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
        Ok(from_bytes(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FrameSnapshot {
        FrameSnapshot {
            tick: 120,
            paused: false,
            field: Rect::new(0.0, 0.0, 600.0, 400.0),
            ball: Rect::new(295.0, 195.0, 10.0, 10.0),
            paddles: vec![PaddleView {
                seat: 0,
                rect: Rect::new(20.0, 175.0, 20.0, 50.0),
                frozen: true,
                inverted: false,
            }],
            bonuses: vec![BonusView {
                kind: PowerUp::Potion,
                rect: Rect::new(200.0, 80.0, 20.0, 20.0),
            }],
            walls: vec![],
            scores: vec![3, 1],
        }
    }

    #[test]
    fn test_frame_serialization() {
        let msg = S2C::Frame(snapshot());
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        let decoded = S2C::from_bytes(&bytes).expect("Deserialization should succeed");
        match decoded {
            S2C::Frame(frame) => {
                assert_eq!(frame.tick, 120);
                assert!(frame.paddles[0].frozen);
                assert_eq!(frame.bonuses[0].kind, PowerUp::Potion);
            }
            _ => panic!("Message type mismatch"),
        }
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let bytes = S2C::Frame(snapshot()).to_bytes().unwrap();
        let err = S2C::from_bytes(&bytes[..bytes.len() / 2]);
        assert!(matches!(err, Err(ProtoError::Frame(_))));
    }
}
