use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::map::{Aabb, Axis, Side};
use crate::resources::GameRng;

/// Paddle component - one per seat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub seat: u8,
    pub side: Side,
    pub pos: Vec2, // top-left corner
    pub size: Vec2,
    pub speed: f32, // units per tick
    pub frozen_until: u64,
    pub inverted_until: u64,
    pub centerline: f32, // rest position of the paddle centre along its axis
}

impl Paddle {
    pub fn new(seat: u8, side: Side, pos: Vec2, size: Vec2, speed: f32) -> Self {
        let centerline = side.axis().of(pos + size * 0.5);
        Self {
            seat,
            side,
            pos,
            size,
            speed,
            frozen_until: 0,
            inverted_until: 0,
            centerline,
        }
    }

    pub fn axis(&self) -> Axis {
        self.side.axis()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Extent along the movement axis
    pub fn length(&self) -> f32 {
        self.axis().of(self.size)
    }

    pub fn half_length(&self) -> f32 {
        self.length() * 0.5
    }

    /// Centre coordinate along the movement axis
    pub fn axis_center(&self) -> f32 {
        self.axis().of(self.center())
    }

    /// Coordinate of the face the ball strikes, on the cross axis
    pub fn face(&self) -> f32 {
        match self.side {
            Side::Left => self.pos.x + self.size.x,
            Side::Right => self.pos.x,
            Side::Top => self.pos.y + self.size.y,
            Side::Bottom => self.pos.y,
        }
    }

    pub fn is_frozen(&self, now_ms: u64) -> bool {
        now_ms < self.frozen_until
    }

    pub fn is_inverted(&self, now_ms: u64) -> bool {
        now_ms < self.inverted_until
    }

    /// Overlapping freezes extend, never shorten
    pub fn freeze_until(&mut self, deadline: u64) {
        self.frozen_until = self.frozen_until.max(deadline);
    }

    pub fn invert_until(&mut self, deadline: u64) {
        self.inverted_until = self.inverted_until.max(deadline);
    }

    pub fn clear_effects(&mut self) {
        self.frozen_until = 0;
        self.inverted_until = 0;
    }
}

/// Movement intent for paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleIntent {
    pub dir: i8, // -1 = toward lower coordinate (up/left), 0 = hold, 1 = toward higher
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decision state of a computer-driven paddle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AiBrain {
    pub next_decision_at: u64,
    pub target: Option<f32>, // paddle-centre coordinate along its axis
}

/// Strategy that produces a paddle's intent each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Controller {
    Keyboard,
    Ai(AiBrain),
}

impl Controller {
    pub fn is_ai(&self) -> bool {
        matches!(self, Controller::Ai(_))
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2, // top-left corner
    pub size: Vec2,
    pub vel: Vec2, // direction, not necessarily normalised
    pub base_speed: f32,
    pub speed: f32,
    pub last_touched_by: Option<u8>,
}

impl Ball {
    pub fn new(pos: Vec2, size: Vec2, vel: Vec2, base_speed: f32) -> Self {
        Self {
            pos,
            size,
            vel,
            base_speed,
            speed: base_speed,
            last_touched_by: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Displacement for one tick; a zero direction does not move
    pub fn step_delta(&self) -> Vec2 {
        self.vel.normalize_or_zero() * self.speed
    }

    /// Re-serve from `center` along `dir`, starting a new rally
    pub fn serve(&mut self, center: Vec2, dir: Vec2) {
        self.pos = center - self.size * 0.5;
        self.vel = dir;
        self.speed = self.base_speed;
        self.last_touched_by = None;
    }

    /// Multiply speed, staying within [base, cap]
    pub fn boost(&mut self, factor: f32, cap: f32) {
        self.speed = (self.speed * factor).min(cap).max(self.base_speed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Wall,
    Ice,
    Potion,
    Speed,
}

impl BonusKind {
    pub const ALL: [BonusKind; 4] = [
        BonusKind::Wall,
        BonusKind::Ice,
        BonusKind::Potion,
        BonusKind::Speed,
    ];

    pub fn random(rng: &mut GameRng) -> Self {
        Self::ALL[rng.0.gen_range(0..Self::ALL.len())]
    }
}

/// Collectible power-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bonus {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BonusKind,
}

impl Bonus {
    pub fn new(pos: Vec2, size: Vec2, kind: BonusKind) -> Self {
        Self { pos, size, kind }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Obstacle left behind by a Wall bonus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticWall {
    pub pos: Vec2,
    pub size: Vec2,
}

impl StaticWall {
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}
