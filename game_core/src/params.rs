/// Game tuning parameters for Pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Field
    pub const FIELD_WIDTH_TWO: f32 = 600.0;
    pub const FIELD_HEIGHT_TWO: f32 = 400.0;
    pub const FIELD_SIZE_FOUR: f32 = 500.0; // square arena for four paddles
    pub const FIELD_MARGIN: f32 = 20.0;
    pub const RAIL_INSET: f32 = 10.0; // top/bottom bounce line in two-player mode

    // Paddle
    pub const PADDLE_LENGTH: f32 = 50.0;
    pub const PADDLE_THICKNESS_TWO: f32 = 20.0;
    pub const PADDLE_THICKNESS_FOUR: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 10.0; // units per tick

    // Ball
    pub const BALL_SIZE: f32 = 10.0;
    pub const BALL_BASE_SPEED: f32 = 5.0; // units per tick
    pub const BALL_RAMP_MAX_SPEED: f32 = 12.0;
    pub const BALL_MAX_SPEED: f32 = 15.0; // hard cap, bonuses included
    pub const BALL_RAMP_DELAY_MS: u64 = 10_000;
    pub const BALL_RAMP_INTERVAL_MS: u64 = 5_000;
    pub const BALL_RAMP_STEP: f32 = 0.5;
    pub const DEFLECTION_GAIN: f32 = 1.2;
    pub const SERVE_JITTER_FOUR: f32 = 25.0;
    pub const WALL_NUDGE: f32 = 1.0;

    // Score
    pub const WIN_SCORE: u32 = 5; // First to 5 ends the match

    // Timing
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    pub const PAUSE_MS: u64 = 2_000; // after match start and after each goal

    // AI
    pub const AI_DECISION_INTERVAL_MS: u64 = 1_000;
    pub const AI_DEADZONE: f32 = 5.0;
    pub const AI_RECENTER_TWO: f32 = 50.0;
    pub const AI_RECENTER_FOUR: f32 = 20.0;
    pub const AI_MAX_PREDICTION_STEPS: usize = 4_096;

    // Bonuses
    pub const BONUS_SIZE: f32 = 20.0;
    pub const BONUS_CAP: usize = 3;
    pub const BONUS_WARMUP_MS: u64 = 7_000;
    pub const BONUS_INTERVAL_MS: u64 = 4_000;
    pub const BONUS_BAND_TWO: f32 = 20.0;
    pub const BONUS_BAND_FOUR: f32 = 60.0;
    pub const WALL_SIZE: f32 = 40.0;
    pub const WALL_CAP: usize = 3;
    pub const WALL_SPAWN_DELAY_MS: u64 = 300;
    pub const WALL_SAFE_RADIUS_FOUR: f32 = 30.0;
    pub const FREEZE_MS_TWO: u64 = 1_250;
    pub const FREEZE_MS_FOUR: u64 = 2_000;
    pub const INVERT_MS_TWO: u64 = 4_000;
    pub const INVERT_MS_FOUR: u64 = 5_000;
    pub const SPEED_FACTOR_TWO: f32 = 1.1;
    pub const SPEED_FACTOR_FOUR: f32 = 1.2;

    // Players
    pub const ALIAS_MIN_CHARS: usize = 2;
    pub const ALIAS_MAX_CHARS: usize = 15;
}
