use std::sync::Arc;

use proto::{GameType, MatchRecord, PlayerRecord, Round, ScoreSubmission};

use crate::error::GatewayError;

/// Remote persistence service.
///
/// Used through generics only, so the futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait PersistenceGateway {
    async fn create_player(&self, name: &str) -> Result<u64, GatewayError>;

    async fn create_match(&self, players: [u64; 2], game_type: GameType) -> Result<u64, GatewayError>;

    async fn create_match4(&self, players: [u64; 4], game_type: GameType) -> Result<u64, GatewayError>;

    /// Store a final score; the service decides the winner
    async fn submit_score(&self, submission: ScoreSubmission) -> Result<MatchRecord, GatewayError>;

    async fn create_tournament(&self) -> Result<u64, GatewayError>;

    async fn add_player_to_tournament(&self, tournament_id: u64, player_id: u64) -> Result<(), GatewayError>;

    async fn create_tournament_match(
        &self,
        tournament_id: u64,
        player1: u64,
        player2: u64,
        round: Round,
        match_number: u8,
    ) -> Result<u64, GatewayError>;

    async fn activate_tournament(&self, tournament_id: u64) -> Result<(), GatewayError>;

    async fn get_match(&self, match_id: u64) -> Result<MatchRecord, GatewayError>;

    async fn get_player(&self, player_id: u64) -> Result<PlayerRecord, GatewayError>;
}

impl<G: PersistenceGateway> PersistenceGateway for Arc<G> {
    async fn create_player(&self, name: &str) -> Result<u64, GatewayError> {
        (**self).create_player(name).await
    }

    async fn create_match(&self, players: [u64; 2], game_type: GameType) -> Result<u64, GatewayError> {
        (**self).create_match(players, game_type).await
    }

    async fn create_match4(&self, players: [u64; 4], game_type: GameType) -> Result<u64, GatewayError> {
        (**self).create_match4(players, game_type).await
    }

    async fn submit_score(&self, submission: ScoreSubmission) -> Result<MatchRecord, GatewayError> {
        (**self).submit_score(submission).await
    }

    async fn create_tournament(&self) -> Result<u64, GatewayError> {
        (**self).create_tournament().await
    }

    async fn add_player_to_tournament(&self, tournament_id: u64, player_id: u64) -> Result<(), GatewayError> {
        (**self).add_player_to_tournament(tournament_id, player_id).await
    }

    async fn create_tournament_match(
        &self,
        tournament_id: u64,
        player1: u64,
        player2: u64,
        round: Round,
        match_number: u8,
    ) -> Result<u64, GatewayError> {
        (**self)
            .create_tournament_match(tournament_id, player1, player2, round, match_number)
            .await
    }

    async fn activate_tournament(&self, tournament_id: u64) -> Result<(), GatewayError> {
        (**self).activate_tournament(tournament_id).await
    }

    async fn get_match(&self, match_id: u64) -> Result<MatchRecord, GatewayError> {
        (**self).get_match(match_id).await
    }

    async fn get_player(&self, player_id: u64) -> Result<PlayerRecord, GatewayError> {
        (**self).get_player(player_id).await
    }
}
