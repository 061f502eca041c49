use std::time::Instant;

use game_core::*;
use glam::Vec2;
use proto::{BonusView, FrameSnapshot, PaddleView, PowerUp, Rect, S2C};

use crate::HostError;

// Abstract drawing surface for testing
pub trait Surface {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), HostError>;
}

// Abstract environment (time)
pub trait Environment {
    fn now(&self) -> u64; // ms
}

/// Monotonic milliseconds since the host was created
pub struct SystemEnv {
    origin: Instant,
}

impl SystemEnv {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Everything needed to build a match
#[derive(Debug, Clone)]
pub struct MatchSetup {
    pub mode: Mode,
    pub config: Config,
    pub match_id: u64,
    pub players: Vec<PlayerRef>,
    pub seed: u64,
}

impl MatchSetup {
    pub fn new(mode: Mode, match_id: u64, players: Vec<PlayerRef>, seed: u64) -> Self {
        Self {
            mode,
            config: Config::for_mode(mode),
            match_id,
            players,
            seed,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}

/// Session host: one drawing surface, at most one live simulation
pub struct MatchHost {
    env: Box<dyn Environment>,
    surface: Option<Box<dyn Surface>>,
    sim: Option<Simulation>,
    frames_sent: u64,
}

impl MatchHost {
    pub fn new(env: Box<dyn Environment>) -> Self {
        Self {
            env,
            surface: None,
            sim: None,
            frames_sent: 0,
        }
    }

    pub fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        self.surface = Some(surface);
    }

    pub fn detach_surface(&mut self) -> Option<Box<dyn Surface>> {
        self.surface.take()
    }

    pub fn now(&self) -> u64 {
        self.env.now()
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        self.sim.as_mut()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Start a new match, tearing down the live one first.
    ///
    /// Fails without touching the live match if no surface is attached or the
    /// setup is invalid.
    pub fn start_match(&mut self, setup: MatchSetup) -> Result<TransitionResult, HostError> {
        if self.surface.is_none() {
            return Err(HostError::NoSurface);
        }
        let mut sim = Simulation::new(
            setup.mode,
            setup.config,
            setup.match_id,
            setup.players,
            setup.seed,
        )?;

        self.teardown();
        let now = self.env.now();
        let result = sim.start(now);
        log::info!(
            "host: match {} started ({:?}, {:?})",
            setup.match_id,
            setup.mode.players,
            setup.mode.variant
        );
        self.sim = Some(sim);
        Ok(result)
    }

    /// Display-refresh callback: advance at most one tick and present the frame
    pub fn pump(&mut self) -> FrameOutcome {
        let now = self.env.now();
        let Some(sim) = self.sim.as_mut() else {
            return FrameOutcome::Halted;
        };
        let outcome = sim.frame(now);
        if outcome == FrameOutcome::Halted {
            return outcome;
        }

        let frame = S2C::Frame(snapshot(sim, now));
        let game_over = match &outcome {
            FrameOutcome::Finished(result) => Some(S2C::GameOver {
                winner_seat: result.winner_seat,
                winner_alias: result.winner().map(|p| p.alias.clone()).unwrap_or_default(),
                scores: result.scores.clone(),
            }),
            _ => None,
        };
        self.present(&frame);
        if let Some(msg) = game_over {
            self.present(&msg);
        }
        outcome
    }

    fn present(&mut self, msg: &S2C) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        match msg.to_bytes() {
            Ok(bytes) => match surface.send_bytes(&bytes) {
                Ok(()) => self.frames_sent += 1,
                Err(e) => log::warn!("host: frame dropped: {e}"),
            },
            Err(e) => log::warn!("host: frame encoding failed: {e}"),
        }
    }

    pub fn press(&mut self, seat: u8, key: Key) {
        if let Some(sim) = self.sim.as_mut() {
            sim.press(seat, key);
        }
    }

    pub fn release(&mut self, seat: u8, key: Key) {
        if let Some(sim) = self.sim.as_mut() {
            sim.release(seat, key);
        }
    }

    /// Stop the live match, if any; pending effects never fire afterwards
    pub fn teardown(&mut self) {
        if let Some(mut sim) = self.sim.take() {
            sim.teardown();
            log::info!("host: match {} torn down", sim.lifecycle().match_id());
        }
    }

    /// Leaving the page: stop the match and cancel any tournament sequence
    pub fn navigate_away(&mut self, cancel: &tournament::CancellationFlag) {
        cancel.cancel();
        self.teardown();
    }
}

fn rect(pos: Vec2, size: Vec2) -> Rect {
    Rect::new(pos.x, pos.y, size.x, size.y)
}

fn power_up(kind: BonusKind) -> PowerUp {
    match kind {
        BonusKind::Wall => PowerUp::Wall,
        BonusKind::Ice => PowerUp::Ice,
        BonusKind::Potion => PowerUp::Potion,
        BonusKind::Speed => PowerUp::Speed,
    }
}

/// Frame for the drawing surface as of the display time `now_ms`
pub fn snapshot(sim: &Simulation, now_ms: u64) -> FrameSnapshot {
    let now = now_ms.max(sim.ctx.time.now_ms);
    let ball = sim
        .ball()
        .map(|b| rect(b.pos, b.size))
        .unwrap_or_else(|| rect(sim.ctx.field.center(), Vec2::ZERO));
    FrameSnapshot {
        tick: sim.ctx.time.tick,
        paused: sim.is_paused(now),
        field: rect(Vec2::ZERO, sim.ctx.field.size),
        ball,
        paddles: sim
            .paddles()
            .iter()
            .map(|p| PaddleView {
                seat: p.seat,
                rect: rect(p.pos, p.size),
                frozen: p.is_frozen(now),
                inverted: p.is_inverted(now),
            })
            .collect(),
        bonuses: sim
            .bonuses()
            .iter()
            .map(|b| BonusView {
                kind: power_up(b.kind),
                rect: rect(b.pos, b.size),
            })
            .collect(),
        walls: sim.walls().iter().map(|w| rect(w.pos, w.size)).collect(),
        scores: sim.score().points.clone(),
    }
}
