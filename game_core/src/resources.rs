use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;

use crate::components::BonusKind;
use crate::map::Side;

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time {
    pub now_ms: u64, // timestamp of the current tick
    pub tick: u64,   // ticks simulated so far
}

impl Time {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms, tick: 0 }
    }
}

/// Per-seat score tracking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    pub points: Vec<u32>,
}

impl Score {
    pub fn new(seats: usize) -> Self {
        Self {
            points: vec![0; seats],
        }
    }

    pub fn from_points(points: &[u32]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    pub fn credit(&mut self, seat: u8) {
        if let Some(p) = self.points.get_mut(seat as usize) {
            *p += 1;
        }
    }

    pub fn get(&self, seat: u8) -> u32 {
        self.points.get(seat as usize).copied().unwrap_or(0)
    }

    /// Highest scorer once that score reaches `threshold`; equal leaders go to the lowest seat
    pub fn leader_at(&self, threshold: u32) -> Option<u8> {
        let best = self.points.iter().copied().max()?;
        if best < threshold {
            return None;
        }
        self.points
            .iter()
            .position(|p| *p == best)
            .map(|seat| seat as u8)
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events {
    pub goal: Option<Side>,
    pub scorer: Option<u8>,
    pub paddle_hit: Option<u8>,
    pub rail_bounce: bool,
    pub wall_hit: bool,
    pub bonus_spawned: Option<BonusKind>,
    pub bonus_collected: Option<BonusKind>,
    pub wall_spawned: bool,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Effect that fires once its deadline passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledEffect {
    SpawnWall { center: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub due_ms: u64,
    pub effect: ScheduledEffect,
}

/// Deadline table drained once per tick
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<Scheduled>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due_ms: u64, effect: ScheduledEffect) {
        self.entries.push(Scheduled { due_ms, effect });
    }

    /// Remove and return every effect due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: u64) -> Vec<ScheduledEffect> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due_ms <= now_ms);
        self.entries = pending;
        due.sort_by_key(|e| e.due_ms);
        due.into_iter().map(|e| e.effect).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Live bonuses and walls in spawn order, plus the spawn cycle timer
#[derive(Debug, Clone, Default)]
pub struct BonusBoard {
    pub bonuses: VecDeque<Entity>,
    pub walls: VecDeque<Entity>,
    pub cycle_start: u64,
    pub last_spawn: Option<u64>,
}

impl BonusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart_cycle(&mut self, now_ms: u64) {
        self.cycle_start = now_ms;
        self.last_spawn = None;
    }
}

/// Rally timing and the pause window that follows a serve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rally {
    pub started_at: u64,
    pub paused_until: u64,
}

impl Rally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause for `pause_ms`; the rally clock starts when the pause ends
    pub fn begin_pause(&mut self, now_ms: u64, pause_ms: u64) {
        self.paused_until = now_ms + pause_ms;
        self.started_at = self.paused_until;
    }

    pub fn is_paused(&self, now_ms: u64) -> bool {
        now_ms < self.paused_until
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at)
    }
}

/// Directional keys; `Up` moves toward the lower coordinate (left for top/bottom paddles)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
}

/// Held keys per seat
#[derive(Debug, Clone)]
pub struct InputState {
    held: [[bool; 2]; 4],
    attached: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            held: [[false; 2]; 4],
            attached: true,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, seat: u8, key: Key) {
        self.set(seat, key, true);
    }

    pub fn release(&mut self, seat: u8, key: Key) {
        self.set(seat, key, false);
    }

    fn set(&mut self, seat: u8, key: Key, down: bool) {
        if !self.attached {
            return;
        }
        if let Some(keys) = self.held.get_mut(seat as usize) {
            keys[key as usize] = down;
        }
    }

    /// -1, 0 or 1 for the seat's held keys
    pub fn dir(&self, seat: u8) -> i8 {
        match self.held.get(seat as usize) {
            Some([up, down]) => *down as i8 - *up as i8,
            None => 0,
        }
    }

    /// Drop all held keys and ignore further input
    pub fn detach(&mut self) {
        self.held = [[false; 2]; 4];
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}
