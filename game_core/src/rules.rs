//! Match modes and the per-mode rules every system consults.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::map::Side;
use crate::params::Params;
use crate::resources::GameRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerCount {
    Two,
    Four,
}

impl PlayerCount {
    pub fn seats(self) -> usize {
        match self {
            PlayerCount::Two => 2,
            PlayerCount::Four => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Classic,
    PowerUps,
}

/// `{playerCount, variant}` pair selecting how a simulation behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mode {
    pub players: PlayerCount,
    pub variant: Variant,
}

const TWO_SIDES: [Side; 2] = [Side::Left, Side::Right];
const FOUR_SIDES: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

impl Mode {
    pub const fn new(players: PlayerCount, variant: Variant) -> Self {
        Self { players, variant }
    }

    pub fn seats(&self) -> usize {
        self.players.seats()
    }

    pub fn power_ups(&self) -> bool {
        self.variant == Variant::PowerUps
    }

    /// Sides in seat order
    pub fn sides(&self) -> &'static [Side] {
        match self.players {
            PlayerCount::Two => &TWO_SIDES,
            PlayerCount::Four => &FOUR_SIDES,
        }
    }

    pub fn side_of(&self, seat: u8) -> Option<Side> {
        self.sides().get(seat as usize).copied()
    }

    pub fn seat_of(&self, side: Side) -> Option<u8> {
        self.sides().iter().position(|s| *s == side).map(|i| i as u8)
    }

    /// Two-player fields bounce the ball off top and bottom rails
    pub fn has_rails(&self) -> bool {
        self.players == PlayerCount::Two
    }

    pub fn is_goal(&self, side: Side) -> bool {
        self.sides().contains(&side)
    }

    /// Seat credited when the ball crosses `side`.
    ///
    /// Two-player: the opponent of the defending seat. Four-player: the
    /// edge's owner keeps the tally, as the four-paddle game has always counted.
    pub fn credited_seat(&self, side: Side) -> Option<u8> {
        match self.players {
            PlayerCount::Two => match side {
                Side::Left => Some(1),
                Side::Right => Some(0),
                Side::Top | Side::Bottom => None,
            },
            PlayerCount::Four => self.seat_of(side),
        }
    }

    /// Only the classic variant speeds the ball up over a rally
    pub fn ramps_speed(&self) -> bool {
        self.variant == Variant::Classic
    }

    /// Random serve direction (not normalised)
    pub fn serve_direction(&self, rng: &mut GameRng) -> Vec2 {
        let x = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
        match self.players {
            PlayerCount::Two => {
                let y = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
                Vec2::new(x, y)
            }
            PlayerCount::Four => Vec2::new(x, rng.0.gen_range(-2.0..=2.0)),
        }
    }

    /// Offset from field centre for the serve position
    pub fn serve_offset(&self, rng: &mut GameRng) -> Vec2 {
        match self.players {
            PlayerCount::Two => Vec2::ZERO,
            PlayerCount::Four => {
                let j = Params::SERVE_JITTER_FOUR;
                Vec2::new(rng.0.gen_range(-j..=j), rng.0.gen_range(-j..=j))
            }
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::new(PlayerCount::Two, Variant::Classic)
    }
}
