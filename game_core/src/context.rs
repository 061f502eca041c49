use crate::config::Config;
use crate::map::Field;
use crate::resources::{BonusBoard, Events, GameRng, InputState, Rally, Schedule, Score, Time};
use crate::rules::Mode;

/// Mutable state of one match, owned by a single simulation and lent to every system
pub struct MatchContext {
    pub mode: Mode,
    pub config: Config,
    pub field: Field,
    pub time: Time,
    pub score: Score,
    pub rng: GameRng,
    pub events: Events,
    pub schedule: Schedule,
    pub bonuses: BonusBoard,
    pub rally: Rally,
    pub input: InputState,
}

impl MatchContext {
    pub fn new(mode: Mode, config: Config, seed: u64) -> Self {
        let field = config.field();
        Self {
            mode,
            config,
            field,
            time: Time::default(),
            score: Score::new(mode.seats()),
            rng: GameRng::new(seed),
            events: Events::new(),
            schedule: Schedule::new(),
            bonuses: BonusBoard::new(),
            rally: Rally::new(),
            input: InputState::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.time.now_ms
    }
}
