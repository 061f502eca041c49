//! Score reporting and match registration against the persistence gateway

use game_core::{validate_alias, MatchOutcome, Mode, PlayerCount, PlayerRef};
use proto::{GameType, MatchRecord, ScoreSubmission};
use tournament::{GatewayError, MatchCompletion, NextStep, PersistenceGateway, TournamentError};

use crate::HostError;

/// What happened to a final score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Stored(MatchRecord),
    /// Logged and reported; nothing retries it
    Failed(GatewayError),
}

impl SubmitOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, SubmitOutcome::Stored(_))
    }

    pub fn record(&self) -> Option<&MatchRecord> {
        match self {
            SubmitOutcome::Stored(record) => Some(record),
            SubmitOutcome::Failed(_) => None,
        }
    }
}

/// Post the final score of a completed match
pub async fn submit_outcome<G: PersistenceGateway>(gateway: &G, outcome: &MatchOutcome) -> SubmitOutcome {
    let submission = match ScoreSubmission::from_scores(outcome.match_id, &outcome.scores) {
        Ok(submission) => submission,
        Err(e) => {
            log::warn!("match {}: score not submitted: {e}", outcome.match_id);
            return SubmitOutcome::Failed(GatewayError::Rejected(e.to_string()));
        }
    };
    match gateway.submit_score(submission).await {
        Ok(record) => {
            log::info!(
                "match {} stored, winner {:?}",
                record.id,
                record.winner_id
            );
            SubmitOutcome::Stored(record)
        }
        Err(e) => {
            log::warn!("match {}: score submission failed: {e}", outcome.match_id);
            SubmitOutcome::Failed(e)
        }
    }
}

/// Submit a tournament match result, then advance the bracket whatever the
/// submission did
pub async fn finish_tournament_match<G, C>(
    gateway: &G,
    completion: &mut C,
    outcome: &MatchOutcome,
) -> Result<(SubmitOutcome, NextStep), TournamentError>
where
    G: PersistenceGateway,
    C: MatchCompletion,
{
    let submitted = submit_outcome(gateway, outcome).await;
    let step = completion.on_match_complete(outcome).await?;
    Ok((submitted, step))
}

/// Register players and a casual match (2 or 4 players) with the gateway.
///
/// Names are checked before any call is made. Returns the match id and the
/// seated players.
pub async fn register_casual_match<G: PersistenceGateway>(
    gateway: &G,
    mode: Mode,
    names: &[&str],
) -> Result<(u64, Vec<PlayerRef>), HostError> {
    if names.len() != mode.seats() {
        return Err(game_core::CoreError::SeatCount {
            expected: mode.seats(),
            got: names.len(),
        }
        .into());
    }
    let aliases = names
        .iter()
        .map(|name| validate_alias(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut players = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let id = gateway.create_player(&alias).await?;
        players.push(PlayerRef::new(id, alias));
    }

    let ids: Vec<u64> = players.iter().map(|p| p.id).collect();
    let match_id = match (mode.players, ids.as_slice()) {
        (PlayerCount::Two, [a, b]) => gateway.create_match([*a, *b], GameType::Pong).await?,
        (PlayerCount::Four, [a, b, c, d]) => {
            gateway.create_match4([*a, *b, *c, *d], GameType::Pong).await?
        }
        _ => {
            return Err(game_core::CoreError::SeatCount {
                expected: mode.seats(),
                got: ids.len(),
            }
            .into())
        }
    };
    log::info!("casual match {match_id} registered for {names:?}");
    Ok((match_id, players))
}
