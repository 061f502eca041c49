//! In-process persistence service
//!
//! Applies the same rules as the remote backend: trimmed names of 2 to 15
//! characters, server-side winner selection, idempotent score submission and
//! tournament completion once both closing matches are in.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use game_core::validate_alias;
use proto::{
    GameType, LifecycleEvent, MatchRecord, PlayerRecord, RecordStatus, Round, ScoreSubmission,
    TournamentRecord,
};
use tokio::sync::Mutex;

use crate::error::GatewayError;
use crate::gateway::PersistenceGateway;

#[derive(Debug, Default)]
struct Store {
    next_player: u64,
    next_match: u64,
    next_tournament: u64,
    players: BTreeMap<u64, PlayerRecord>,
    matches: BTreeMap<u64, MatchRecord>,
    tournaments: BTreeMap<u64, TournamentRecord>,
    events: Vec<LifecycleEvent>,
}

impl Store {
    fn player(&self, id: u64) -> Result<&PlayerRecord, GatewayError> {
        self.players
            .get(&id)
            .ok_or(GatewayError::NotFound { kind: "player", id })
    }

    fn tournament_mut(&mut self, id: u64) -> Result<&mut TournamentRecord, GatewayError> {
        self.tournaments
            .get_mut(&id)
            .ok_or(GatewayError::NotFound { kind: "tournament", id })
    }

    fn insert_match(&mut self, mut record: MatchRecord) -> Result<u64, GatewayError> {
        for id in &record.player_ids {
            self.player(*id)?;
        }
        self.next_match += 1;
        record.id = self.next_match;
        self.events.push(LifecycleEvent::MatchCreated {
            tournament_id: record.tournament_id,
            match_id: record.id,
            player_ids: record.player_ids.clone(),
        });
        log::debug!("match {} created for {:?}", record.id, record.player_ids);
        let id = record.id;
        self.matches.insert(id, record);
        Ok(id)
    }

    /// Complete the tournament once its final and third-place matches are both done
    fn settle_tournament(&mut self, tournament_id: u64) {
        let closing_done = |round: Round| {
            self.matches
                .values()
                .any(|m| m.tournament_id == Some(tournament_id) && m.round == Some(round) && m.is_completed())
        };
        if !(closing_done(Round::Final) && closing_done(Round::ThirdPlace)) {
            return;
        }
        if let Some(tournament) = self.tournaments.get_mut(&tournament_id) {
            if tournament.status != RecordStatus::Completed {
                tournament.status = RecordStatus::Completed;
                self.events.push(LifecycleEvent::TournamentStatusUpdated {
                    id: tournament_id,
                    status: RecordStatus::Completed,
                });
                log::info!("tournament {tournament_id} completed");
            }
        }
    }
}

/// Winner rule: two players need a strict lead, four players go to the
/// highest score with ties resolved to the lowest seat
pub fn decide_winner(player_ids: &[u64], scores: &[u32]) -> Option<u64> {
    match (player_ids, scores) {
        ([p1, p2], [s1, s2]) => match s1.cmp(s2) {
            std::cmp::Ordering::Greater => Some(*p1),
            std::cmp::Ordering::Less => Some(*p2),
            std::cmp::Ordering::Equal => None,
        },
        _ => {
            let best = scores.iter().copied().max()?;
            let seat = scores.iter().position(|s| *s == best)?;
            player_ids.get(seat).copied()
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    store: Mutex<Store>,
    unavailable: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), GatewayError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable);
        }
        Ok(())
    }

    /// Take every lifecycle event pushed so far
    pub async fn drain_events(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.store.lock().await.events)
    }

    pub async fn tournament(&self, id: u64) -> Result<TournamentRecord, GatewayError> {
        self.ensure_available()?;
        let store = self.store.lock().await;
        store
            .tournaments
            .get(&id)
            .cloned()
            .ok_or(GatewayError::NotFound { kind: "tournament", id })
    }

    pub async fn tournament_matches(&self, tournament_id: u64) -> Vec<MatchRecord> {
        let store = self.store.lock().await;
        store
            .matches
            .values()
            .filter(|m| m.tournament_id == Some(tournament_id))
            .cloned()
            .collect()
    }

    /// Completed matches of one game type and player count, newest first
    pub async fn history(&self, game_type: GameType, players: usize) -> Vec<MatchRecord> {
        let store = self.store.lock().await;
        store
            .matches
            .values()
            .rev()
            .filter(|m| m.is_completed() && m.game_type == game_type && m.player_ids.len() == players)
            .cloned()
            .collect()
    }
}

impl PersistenceGateway for MemoryGateway {
    async fn create_player(&self, name: &str) -> Result<u64, GatewayError> {
        self.ensure_available()?;
        let name = validate_alias(name).map_err(|e| GatewayError::Rejected(e.to_string()))?;
        let mut store = self.store.lock().await;
        store.next_player += 1;
        let id = store.next_player;
        store.players.insert(
            id,
            PlayerRecord {
                id,
                name,
                tournament_id: None,
            },
        );
        Ok(id)
    }

    async fn create_match(&self, players: [u64; 2], game_type: GameType) -> Result<u64, GatewayError> {
        self.ensure_available()?;
        let mut store = self.store.lock().await;
        store.insert_match(MatchRecord {
            id: 0,
            game_type,
            player_ids: players.to_vec(),
            scores: vec![0; 2],
            status: RecordStatus::Pending,
            winner_id: None,
            tournament_id: None,
            round: None,
            match_number: None,
        })
    }

    async fn create_match4(&self, players: [u64; 4], game_type: GameType) -> Result<u64, GatewayError> {
        self.ensure_available()?;
        let mut store = self.store.lock().await;
        store.insert_match(MatchRecord {
            id: 0,
            game_type,
            player_ids: players.to_vec(),
            scores: vec![0; 4],
            status: RecordStatus::Pending,
            winner_id: None,
            tournament_id: None,
            round: None,
            match_number: None,
        })
    }

    async fn submit_score(&self, submission: ScoreSubmission) -> Result<MatchRecord, GatewayError> {
        self.ensure_available()?;
        let mut store = self.store.lock().await;
        let id = submission.match_id;
        let record = store
            .matches
            .get_mut(&id)
            .ok_or(GatewayError::NotFound { kind: "match", id })?;
        if record.is_completed() {
            log::debug!("match {id} already completed, submission ignored");
            return Ok(record.clone());
        }

        let scores = submission.scores();
        if scores.len() != record.player_ids.len() {
            return Err(GatewayError::Rejected(format!(
                "match {id} has {} players, got {} scores",
                record.player_ids.len(),
                scores.len()
            )));
        }
        record.winner_id = decide_winner(&record.player_ids, &scores);
        record.scores = scores;
        record.status = RecordStatus::Completed;
        let record = record.clone();

        store.events.push(LifecycleEvent::MatchScoreUpdated {
            match_id: id,
            scores: record.scores.clone(),
        });
        store.events.push(LifecycleEvent::MatchComplete {
            match_id: id,
            winner_id: record.winner_id,
        });
        if let Some(tournament_id) = record.tournament_id {
            store.settle_tournament(tournament_id);
        }
        Ok(record)
    }

    async fn create_tournament(&self) -> Result<u64, GatewayError> {
        self.ensure_available()?;
        let mut store = self.store.lock().await;
        store.next_tournament += 1;
        let id = store.next_tournament;
        store.tournaments.insert(
            id,
            TournamentRecord {
                id,
                status: RecordStatus::Pending,
                player_ids: Vec::new(),
            },
        );
        store.events.push(LifecycleEvent::TournamentCreated { id });
        Ok(id)
    }

    async fn add_player_to_tournament(&self, tournament_id: u64, player_id: u64) -> Result<(), GatewayError> {
        self.ensure_available()?;
        let mut store = self.store.lock().await;
        store.player(player_id)?;
        let tournament = store.tournament_mut(tournament_id)?;
        if !tournament.player_ids.contains(&player_id) {
            tournament.player_ids.push(player_id);
        }
        if let Some(player) = store.players.get_mut(&player_id) {
            player.tournament_id = Some(tournament_id);
        }
        store.events.push(LifecycleEvent::PlayerAddedToTournament {
            tournament_id,
            player_id,
        });
        Ok(())
    }

    async fn create_tournament_match(
        &self,
        tournament_id: u64,
        player1: u64,
        player2: u64,
        round: Round,
        match_number: u8,
    ) -> Result<u64, GatewayError> {
        self.ensure_available()?;
        let mut store = self.store.lock().await;
        store.tournament_mut(tournament_id)?;
        store.insert_match(MatchRecord {
            id: 0,
            game_type: GameType::Pong,
            player_ids: vec![player1, player2],
            scores: vec![0; 2],
            status: RecordStatus::Pending,
            winner_id: None,
            tournament_id: Some(tournament_id),
            round: Some(round),
            match_number: Some(match_number),
        })
    }

    async fn activate_tournament(&self, tournament_id: u64) -> Result<(), GatewayError> {
        self.ensure_available()?;
        let mut store = self.store.lock().await;
        store.tournament_mut(tournament_id)?.status = RecordStatus::Active;
        store.events.push(LifecycleEvent::TournamentStatusUpdated {
            id: tournament_id,
            status: RecordStatus::Active,
        });
        Ok(())
    }

    async fn get_match(&self, match_id: u64) -> Result<MatchRecord, GatewayError> {
        self.ensure_available()?;
        let store = self.store.lock().await;
        store.matches.get(&match_id).cloned().ok_or(GatewayError::NotFound {
            kind: "match",
            id: match_id,
        })
    }

    async fn get_player(&self, player_id: u64) -> Result<PlayerRecord, GatewayError> {
        self.ensure_available()?;
        let store = self.store.lock().await;
        store.player(player_id).cloned()
    }
}
