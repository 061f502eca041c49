use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::map::Field;
use crate::params::Params;
use crate::rules::{Mode, PlayerCount};

/// Power-up tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusConfig {
    pub size: f32,
    pub cap: usize,
    pub warmup_ms: u64,
    pub interval_ms: u64,
    pub spawn_band: f32, // distance kept from top and bottom edges
    pub wall_size: f32,
    pub wall_cap: usize,
    pub wall_delay_ms: u64,
    pub wall_safe_radius: Option<f32>,
    pub freeze_ms: u64,
    pub invert_ms: u64,
    pub speed_factor: f32,
}

impl BonusConfig {
    pub fn for_players(players: PlayerCount) -> Self {
        let four = players == PlayerCount::Four;
        Self {
            size: Params::BONUS_SIZE,
            cap: Params::BONUS_CAP,
            warmup_ms: Params::BONUS_WARMUP_MS,
            interval_ms: Params::BONUS_INTERVAL_MS,
            spawn_band: if four {
                Params::BONUS_BAND_FOUR
            } else {
                Params::BONUS_BAND_TWO
            },
            wall_size: Params::WALL_SIZE,
            wall_cap: Params::WALL_CAP,
            wall_delay_ms: Params::WALL_SPAWN_DELAY_MS,
            wall_safe_radius: four.then_some(Params::WALL_SAFE_RADIUS_FOUR),
            freeze_ms: if four {
                Params::FREEZE_MS_FOUR
            } else {
                Params::FREEZE_MS_TWO
            },
            invert_ms: if four {
                Params::INVERT_MS_FOUR
            } else {
                Params::INVERT_MS_TWO
            },
            speed_factor: if four {
                Params::SPEED_FACTOR_FOUR
            } else {
                Params::SPEED_FACTOR_TWO
            },
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub field_width: f32,
    pub field_height: f32,
    pub margin: f32,
    pub rail_inset: f32,
    pub paddle_length: f32,
    pub paddle_thickness: f32,
    pub paddle_speed: f32,
    pub ball_size: f32,
    pub ball_base_speed: f32,
    pub ball_ramp_max_speed: f32,
    pub ball_max_speed: f32,
    pub ramp_delay_ms: u64,
    pub ramp_interval_ms: u64,
    pub ramp_step: f32,
    pub deflection_gain: f32,
    pub win_score: u32,
    pub tick_ms: f64,
    pub pause_ms: u64,
    pub ai_decision_ms: u64,
    pub ai_deadzone: f32,
    pub ai_recenter_threshold: f32,
    pub bonus: BonusConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_mode(Mode::default())
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a given mode
    pub fn for_mode(mode: Mode) -> Self {
        let four = mode.players == PlayerCount::Four;
        let (width, height) = if four {
            (Params::FIELD_SIZE_FOUR, Params::FIELD_SIZE_FOUR)
        } else {
            (Params::FIELD_WIDTH_TWO, Params::FIELD_HEIGHT_TWO)
        };
        Self {
            field_width: width,
            field_height: height,
            margin: Params::FIELD_MARGIN,
            rail_inset: Params::RAIL_INSET,
            paddle_length: Params::PADDLE_LENGTH,
            paddle_thickness: if four {
                Params::PADDLE_THICKNESS_FOUR
            } else {
                Params::PADDLE_THICKNESS_TWO
            },
            paddle_speed: Params::PADDLE_SPEED,
            ball_size: Params::BALL_SIZE,
            ball_base_speed: Params::BALL_BASE_SPEED,
            ball_ramp_max_speed: Params::BALL_RAMP_MAX_SPEED,
            ball_max_speed: Params::BALL_MAX_SPEED,
            ramp_delay_ms: Params::BALL_RAMP_DELAY_MS,
            ramp_interval_ms: Params::BALL_RAMP_INTERVAL_MS,
            ramp_step: Params::BALL_RAMP_STEP,
            deflection_gain: Params::DEFLECTION_GAIN,
            win_score: Params::WIN_SCORE,
            tick_ms: Params::TICK_MS,
            pause_ms: Params::PAUSE_MS,
            ai_decision_ms: Params::AI_DECISION_INTERVAL_MS,
            ai_deadzone: Params::AI_DEADZONE,
            ai_recenter_threshold: if four {
                Params::AI_RECENTER_FOUR
            } else {
                Params::AI_RECENTER_TWO
            },
            bonus: BonusConfig::for_players(mode.players),
        }
    }

    /// Mode defaults with the keys of a (possibly partial) JSON object laid over them
    pub fn from_json(mode: Mode, text: &str) -> Result<Self, CoreError> {
        let overrides: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(CoreError::ConfigShape);
        };
        let mut base = serde_json::to_value(Self::for_mode(mode))?;
        merge(&mut base, overrides);
        let config: Config = serde_json::from_value(base)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the clamping invariants
    pub fn validate(&self) -> Result<(), CoreError> {
        let min_extent = self.field_width.min(self.field_height);
        if self.paddle_length + 2.0 * self.margin > min_extent {
            return Err(CoreError::InvalidConfig(
                "paddle plus margins exceed the field".into(),
            ));
        }
        if self.ball_base_speed <= 0.0 || self.ball_max_speed < self.ball_base_speed {
            return Err(CoreError::InvalidConfig(
                "ball speeds must satisfy 0 < base <= max".into(),
            ));
        }
        if self.tick_ms <= 0.0 || self.win_score == 0 {
            return Err(CoreError::InvalidConfig(
                "tick length and win score must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn field(&self) -> Field {
        Field::new(
            Vec2::new(self.field_width, self.field_height),
            self.margin,
            self.rail_inset,
        )
    }

    pub fn ball_extent(&self) -> Vec2 {
        Vec2::splat(self.ball_size)
    }

    /// Paddle box size for a paddle moving along the vertical (side) or horizontal axis
    pub fn paddle_size(&self, vertical: bool) -> Vec2 {
        if vertical {
            Vec2::new(self.paddle_thickness, self.paddle_length)
        } else {
            Vec2::new(self.paddle_length, self.paddle_thickness)
        }
    }
}

fn merge(base: &mut serde_json::Value, overrides: serde_json::Map<String, serde_json::Value>) {
    if let serde_json::Value::Object(target) = base {
        for (key, value) in overrides {
            match value {
                serde_json::Value::Object(nested)
                    if target.get(&key).is_some_and(|v| v.is_object()) =>
                {
                    if let Some(slot) = target.get_mut(&key) {
                        merge(slot, nested);
                    }
                }
                value => {
                    target.insert(key, value);
                }
            }
        }
    }
}
