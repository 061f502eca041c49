//! Session host for Pong matches
//!
//! Owns at most one live simulation, feeds it display-refresh callbacks,
//! presents frames to a drawing surface and reports final scores.

pub mod logging;
pub mod session;
pub mod socket;
pub mod submit;


pub use session::*;
pub use socket::*;
pub use submit::*;

use game_core::CoreError;
use proto::ProtoError;
use tournament::{GatewayError, TournamentError};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no drawing surface attached")]
    NoSurface,
    #[error("surface rejected frame: {0}")]
    Surface(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Proto(#[from] ProtoError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
}
