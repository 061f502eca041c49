//! One live match: entities, context, lifecycle and frame gate together.

use glam::Vec2;
use hecs::World;

use crate::clock::{FrameClock, FrameOutcome};
use crate::components::{AiBrain, Ball, Bonus, Controller, Paddle, StaticWall};
use crate::config::Config;
use crate::context::MatchContext;
use crate::error::CoreError;
use crate::lifecycle::{MatchAction, MatchLifecycle, PlayerRef, TransitionResult};
use crate::resources::{Key, Score};
use crate::rules::Mode;
use crate::systems::scoring::serve_ball;
use crate::{create_ball, create_paddle, step};

pub struct Simulation {
    pub world: World,
    pub ctx: MatchContext,
    lifecycle: MatchLifecycle,
    clock: FrameClock,
    torn_down: bool,
}

impl Simulation {
    /// Build a pending match with one paddle per player; players named `ai` get an AI controller
    pub fn new(
        mode: Mode,
        config: Config,
        match_id: u64,
        players: Vec<PlayerRef>,
        seed: u64,
    ) -> Result<Self, CoreError> {
        if players.len() != mode.seats() {
            return Err(CoreError::SeatCount {
                expected: mode.seats(),
                got: players.len(),
            });
        }
        config.validate()?;

        let mut world = World::new();
        for (seat, (side, player)) in mode.sides().iter().zip(&players).enumerate() {
            let controller = if player.is_ai() {
                Controller::Ai(AiBrain::default())
            } else {
                Controller::Keyboard
            };
            create_paddle(&mut world, &config, seat as u8, *side, controller);
        }
        let center = config.field().center();
        create_ball(&mut world, &config, center, Vec2::X);

        let clock = FrameClock::new(config.tick_ms, 0);
        Ok(Self {
            world,
            ctx: MatchContext::new(mode, config, seed),
            lifecycle: MatchLifecycle::new(match_id, players),
            clock,
            torn_down: false,
        })
    }

    /// Activate the match at `now_ms`: serve, open the first pause window, start the bonus cycle
    pub fn start(&mut self, now_ms: u64) -> TransitionResult {
        let result = self.lifecycle.transition(MatchAction::Start);
        if result.success {
            self.ctx.time.now_ms = now_ms;
            serve_ball(&mut self.world, &mut self.ctx);
            self.ctx.rally.begin_pause(now_ms, self.ctx.config.pause_ms);
            self.ctx.bonuses.restart_cycle(now_ms);
            self.clock.resync(now_ms);
        }
        result
    }

    /// Display-refresh callback: at most one tick per call
    pub fn frame(&mut self, now_ms: u64) -> FrameOutcome {
        if self.torn_down || self.lifecycle.is_completed() {
            return FrameOutcome::Halted;
        }
        if !self.lifecycle.is_active() {
            return FrameOutcome::Idle;
        }

        let now_ms = now_ms.max(self.ctx.time.now_ms);
        if self.ctx.rally.is_paused(now_ms) {
            self.clock.resync(now_ms);
            return FrameOutcome::Paused;
        }
        if !self.clock.advance(now_ms) {
            return FrameOutcome::Idle;
        }

        self.ctx.time.now_ms = now_ms;
        step(&mut self.world, &mut self.ctx);

        if self.ctx.events.scorer.is_some() {
            if let Some(outcome) = self
                .lifecycle
                .settle(&self.ctx.score, self.ctx.config.win_score)
            {
                log::info!(
                    "match {} over, seat {} wins with {:?}",
                    outcome.match_id,
                    outcome.winner_seat,
                    outcome.scores
                );
                self.ctx.input.detach();
                self.ctx.schedule.clear();
                return FrameOutcome::Finished(outcome);
            }
        }
        FrameOutcome::Stepped
    }

    pub fn press(&mut self, seat: u8, key: Key) {
        self.ctx.input.press(seat, key);
    }

    pub fn release(&mut self, seat: u8, key: Key) {
        self.ctx.input.release(seat, key);
    }

    /// Detach input and cancel pending effects; later frames do nothing
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.ctx.input.detach();
        self.ctx.schedule.clear();
        self.torn_down = true;
        log::debug!("match {} torn down", self.lifecycle.match_id());
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether a frame drawn at `now_ms` falls in the pause window
    pub fn is_paused(&self, now_ms: u64) -> bool {
        self.ctx.rally.is_paused(now_ms.max(self.ctx.time.now_ms))
    }

    pub fn lifecycle(&self) -> &MatchLifecycle {
        &self.lifecycle
    }

    pub fn mode(&self) -> Mode {
        self.ctx.mode
    }

    pub fn score(&self) -> &Score {
        &self.ctx.score
    }

    pub fn ball(&self) -> Option<Ball> {
        self.world.query::<&Ball>().iter().next().map(|(_e, b)| *b)
    }

    /// Paddles in seat order
    pub fn paddles(&self) -> Vec<Paddle> {
        let mut paddles: Vec<Paddle> = self
            .world
            .query::<&Paddle>()
            .iter()
            .map(|(_e, p)| *p)
            .collect();
        paddles.sort_by_key(|p| p.seat);
        paddles
    }

    /// Live bonuses, oldest first
    pub fn bonuses(&self) -> Vec<Bonus> {
        self.ctx
            .bonuses
            .bonuses
            .iter()
            .filter_map(|e| self.world.get::<&Bonus>(*e).ok().map(|b| *b))
            .collect()
    }

    /// Static walls, oldest first
    pub fn walls(&self) -> Vec<StaticWall> {
        self.ctx
            .bonuses
            .walls
            .iter()
            .filter_map(|e| self.world.get::<&StaticWall>(*e).ok().map(|w| *w))
            .collect()
    }
}
