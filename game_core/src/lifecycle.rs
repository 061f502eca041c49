//! Single-match lifecycle
//!
//! `Pending -> Active -> Completed`, with `Completed` terminal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::params::Params;
use crate::resources::Score;

/// Match states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Active,
    Completed,
}

/// Actions that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Start,
    Complete,
}

/// Result of a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub success: bool,
    pub from_state: MatchStatus,
    pub to_state: MatchStatus,
    pub action: MatchAction,
}

/// A seated participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: u64,
    pub alias: String,
}

impl PlayerRef {
    pub fn new(id: u64, alias: impl Into<String>) -> Self {
        Self {
            id,
            alias: alias.into(),
        }
    }

    /// Players named `ai` get a computer-driven paddle
    pub fn is_ai(&self) -> bool {
        self.alias.trim().eq_ignore_ascii_case("ai")
    }
}

/// Trim and length-check a display name
pub fn validate_alias(raw: &str) -> Result<String, CoreError> {
    let alias = raw.trim();
    if alias.is_empty() {
        return Err(CoreError::MissingAlias);
    }
    let chars = alias.chars().count();
    if !(Params::ALIAS_MIN_CHARS..=Params::ALIAS_MAX_CHARS).contains(&chars) {
        return Err(CoreError::AliasLength {
            min: Params::ALIAS_MIN_CHARS,
            max: Params::ALIAS_MAX_CHARS,
        });
    }
    Ok(alias.to_string())
}

/// Final result of a completed match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_id: u64,
    pub players: Vec<PlayerRef>,
    pub scores: Vec<u32>,
    pub winner_seat: u8,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<&PlayerRef> {
        self.players.get(self.winner_seat as usize)
    }

    /// Two-player matches only have one loser
    pub fn loser(&self) -> Option<&PlayerRef> {
        if self.players.len() != 2 {
            return None;
        }
        self.players.get(1 - self.winner_seat as usize)
    }
}

/// Match lifecycle state machine
#[derive(Debug, Clone)]
pub struct MatchLifecycle {
    match_id: u64,
    players: Vec<PlayerRef>,
    status: MatchStatus,
    winner: Option<u8>,
}

impl MatchLifecycle {
    pub fn new(match_id: u64, players: Vec<PlayerRef>) -> Self {
        Self {
            match_id,
            players,
            status: MatchStatus::Pending,
            winner: None,
        }
    }

    pub fn match_id(&self) -> u64 {
        self.match_id
    }

    pub fn players(&self) -> &[PlayerRef] {
        &self.players
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn winner(&self) -> Option<&PlayerRef> {
        self.winner.and_then(|seat| self.players.get(seat as usize))
    }

    pub fn is_active(&self) -> bool {
        self.status == MatchStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: MatchAction) -> bool {
        self.next_status(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: MatchAction) -> TransitionResult {
        let from_state = self.status;
        match self.next_status(action) {
            Some(next) => {
                self.status = next;
                log::info!("match {}: {:?} -> {:?}", self.match_id, from_state, next);
                TransitionResult {
                    success: true,
                    from_state,
                    to_state: next,
                    action,
                }
            }
            None => TransitionResult {
                success: false,
                from_state,
                to_state: from_state,
                action,
            },
        }
    }

    fn next_status(&self, action: MatchAction) -> Option<MatchStatus> {
        match (self.status, action) {
            (MatchStatus::Pending, MatchAction::Start) => Some(MatchStatus::Active),
            (MatchStatus::Active, MatchAction::Complete) => Some(MatchStatus::Completed),
            _ => None,
        }
    }

    /// Complete the match once a seat reaches `threshold`.
    ///
    /// Returns the outcome on the call that completes the match, `None` otherwise.
    pub fn settle(&mut self, score: &Score, threshold: u32) -> Option<MatchOutcome> {
        if !self.is_active() {
            return None;
        }
        let seat = score.leader_at(threshold)?;
        if !self.transition(MatchAction::Complete).success {
            return None;
        }
        self.winner = Some(seat);
        Some(MatchOutcome {
            match_id: self.match_id,
            players: self.players.clone(),
            scores: score.points.clone(),
            winner_seat: seat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<PlayerRef> {
        (0..n)
            .map(|i| PlayerRef::new(i as u64 + 1, format!("player{}", i + 1)))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let lifecycle = MatchLifecycle::new(1, players(2));
        assert_eq!(lifecycle.status(), MatchStatus::Pending);
        assert!(lifecycle.winner().is_none());
    }

    #[test]
    fn test_valid_transition() {
        let mut lifecycle = MatchLifecycle::new(1, players(2));
        let result = lifecycle.transition(MatchAction::Start);
        assert!(result.success);
        assert_eq!(result.from_state, MatchStatus::Pending);
        assert_eq!(result.to_state, MatchStatus::Active);
    }

    #[test]
    fn test_invalid_transition() {
        let mut lifecycle = MatchLifecycle::new(1, players(2));
        assert!(!lifecycle.can_transition(MatchAction::Complete));
        let result = lifecycle.transition(MatchAction::Complete);
        assert!(!result.success, "Pending match cannot complete");
        assert_eq!(lifecycle.status(), MatchStatus::Pending);
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut lifecycle = MatchLifecycle::new(1, players(2));
        lifecycle.transition(MatchAction::Start);
        lifecycle.transition(MatchAction::Complete);
        assert!(!lifecycle.can_transition(MatchAction::Start));
        assert!(!lifecycle.can_transition(MatchAction::Complete));
    }

    #[test]
    fn test_settle_below_threshold() {
        let mut lifecycle = MatchLifecycle::new(1, players(2));
        lifecycle.transition(MatchAction::Start);
        assert!(lifecycle.settle(&Score::from_points(&[4, 3]), 5).is_none());
        assert!(lifecycle.is_active());
    }

    #[test]
    fn test_settle_four_player_highest_scorer() {
        let mut lifecycle = MatchLifecycle::new(9, players(4));
        lifecycle.transition(MatchAction::Start);
        let outcome = lifecycle.settle(&Score::from_points(&[2, 5, 3, 1]), 5).unwrap();
        assert_eq!(outcome.winner_seat, 1);
        assert_eq!(outcome.winner().map(|p| p.id), Some(2));
        assert_eq!(lifecycle.status(), MatchStatus::Completed);
        assert!(
            lifecycle.settle(&Score::from_points(&[5, 5, 3, 1]), 5).is_none(),
            "A completed match never settles again"
        );
        assert_eq!(lifecycle.winner().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_outcome_loser_two_player() {
        let outcome = MatchOutcome {
            match_id: 1,
            players: players(2),
            scores: vec![2, 5],
            winner_seat: 1,
        };
        assert_eq!(outcome.loser().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_alias_validation() {
        assert_eq!(validate_alias("  Ada ").unwrap(), "Ada");
        assert!(matches!(validate_alias("   "), Err(CoreError::MissingAlias)));
        assert!(matches!(validate_alias("x"), Err(CoreError::AliasLength { .. })));
        assert!(matches!(
            validate_alias("a-very-long-player-name"),
            Err(CoreError::AliasLength { .. })
        ));
    }

    #[test]
    fn test_ai_alias_detection() {
        assert!(PlayerRef::new(1, "AI").is_ai());
        assert!(PlayerRef::new(1, "ai").is_ai());
        assert!(!PlayerRef::new(1, "Aiden").is_ai());
    }
}
