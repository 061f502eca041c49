//! Persistence-side records, score submissions and lifecycle events

use serde::{Deserialize, Serialize};

use crate::ProtoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    #[default]
    Pong,
    Pfc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Round {
    SemiFinal,
    ThirdPlace,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u64,
    pub name: String,
    pub tournament_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: u64,
    pub game_type: GameType,
    pub player_ids: Vec<u64>,
    pub scores: Vec<u32>,
    pub status: RecordStatus,
    pub winner_id: Option<u64>,
    pub tournament_id: Option<u64>,
    pub round: Option<Round>,
    pub match_number: Option<u8>,
}

impl MatchRecord {
    pub fn is_completed(&self) -> bool {
        self.status == RecordStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: u64,
    pub status: RecordStatus,
    pub player_ids: Vec<u64>,
}

/// Final score posted for a match; the winner is decided by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub match_id: u64,
    pub player1_score: u32,
    pub player2_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player3_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player4_score: Option<u32>,
}

impl ScoreSubmission {
    pub fn from_scores(match_id: u64, scores: &[u32]) -> Result<Self, ProtoError> {
        match *scores {
            [a, b] => Ok(Self {
                match_id,
                player1_score: a,
                player2_score: b,
                player3_score: None,
                player4_score: None,
            }),
            [a, b, c, d] => Ok(Self {
                match_id,
                player1_score: a,
                player2_score: b,
                player3_score: Some(c),
                player4_score: Some(d),
            }),
            _ => Err(ProtoError::ScoreCount(scores.len())),
        }
    }

    /// Scores in seat order
    pub fn scores(&self) -> Vec<u32> {
        let mut scores = vec![self.player1_score, self.player2_score];
        scores.extend(self.player3_score);
        scores.extend(self.player4_score);
        scores
    }

    pub fn to_json(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Push notification envelope: `{"type": "...", "payload": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleEvent {
    TournamentCreated {
        id: u64,
    },
    TournamentStatusUpdated {
        id: u64,
        status: RecordStatus,
    },
    PlayerAddedToTournament {
        tournament_id: u64,
        player_id: u64,
    },
    MatchCreated {
        tournament_id: Option<u64>,
        #[serde(rename = "match")]
        match_id: u64,
        player_ids: Vec<u64>,
    },
    MatchScoreUpdated {
        match_id: u64,
        scores: Vec<u32>,
    },
    MatchComplete {
        match_id: u64,
        winner_id: Option<u64>,
    },
}

impl LifecycleEvent {
    pub fn to_json(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }
}
