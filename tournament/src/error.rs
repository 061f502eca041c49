use game_core::CoreError;

use crate::bracket::{BracketPhase, Stage};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("persistence service unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BracketError {
    #[error("{stage:?} cannot complete while the bracket is at {phase:?}")]
    OutOfOrder { phase: BracketPhase, stage: Stage },
    #[error("{0:?} has no pairing yet")]
    Unpaired(Stage),
    #[error("{0:?} already has a match")]
    AlreadyAssigned(Stage),
    #[error("{0:?} has no match assigned")]
    Unassigned(Stage),
}

#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("tournament cancelled")]
    Cancelled,
    #[error("a tournament needs 4 players, got {0}")]
    PlayerCount(usize),
    #[error("invalid player name: {0}")]
    Validation(#[from] CoreError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Bracket(#[from] BracketError),
    #[error("match {got} is not the current bracket match ({expected:?})")]
    UnexpectedMatch { expected: Option<u64>, got: u64 },
    #[error("no tournament in progress")]
    NoTournament,
}
