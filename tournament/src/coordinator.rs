//! Tournament coordinator
//!
//! Runs the async side of a four-player tournament: registration, the
//! announcement countdown, bracket match creation and champion announcement.
//! Matches themselves are played by the host, which reports each outcome back.

use std::collections::HashMap;
use std::time::Duration;

use game_core::{validate_alias, MatchOutcome, PlayerRef};
use proto::Round;

use crate::bracket::{Bracket, BracketPhase, Stage, StageResult};
use crate::cancel::CancellationFlag;
use crate::error::TournamentError;
use crate::gateway::PersistenceGateway;

/// Seconds announced before the semifinals are created
pub const COUNTDOWN_SECS: u32 = 3;

/// A bracket match as shown to players
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub stage: Stage,
    pub round: Round,
    pub match_id: u64,
    pub aliases: [String; 2],
}

/// The match the host should play next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchAssignment {
    pub tournament_id: u64,
    pub stage: Stage,
    pub match_id: u64,
    pub players: Vec<PlayerRef>,
}

/// What the host should offer after a bracket step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Offer "next match" for this stage; nothing starts on its own
    Offer(Stage),
    /// Tournament over; session state is already cleared
    Champion(PlayerRef),
}

/// Presentation hooks; every method defaults to doing nothing
pub trait TournamentObserver {
    fn countdown(&mut self, _secs_left: u32) {}
    fn show_schedule(&mut self, _entries: &[ScheduleEntry]) {}
    fn clear_schedule(&mut self) {}
    fn champion(&mut self, _player: &PlayerRef) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TournamentObserver for NullObserver {}

/// Receives the outcome of every completed match the host ran
#[allow(async_fn_in_trait)]
pub trait MatchCompletion {
    async fn on_match_complete(&mut self, outcome: &MatchOutcome) -> Result<NextStep, TournamentError>;
}

#[derive(Debug, Clone)]
struct Session {
    tournament_id: u64,
    bracket: Bracket,
    aliases: HashMap<u64, String>,
}

impl Session {
    fn player(&self, id: u64) -> PlayerRef {
        let alias = self.aliases.get(&id).cloned().unwrap_or_default();
        PlayerRef::new(id, alias)
    }

    fn schedule(&self) -> Vec<ScheduleEntry> {
        self.bracket
            .slots()
            .iter()
            .map(|slot| ScheduleEntry {
                stage: slot.stage,
                round: slot.stage.round(),
                match_id: slot.match_id,
                aliases: slot.players.map(|id| self.player(id).alias),
            })
            .collect()
    }
}

pub struct TournamentCoordinator<G, O = NullObserver> {
    gateway: G,
    observer: O,
    cancel: CancellationFlag,
    session: Option<Session>,
    /// Matches stored by the gateway in a step that has not committed yet
    created: HashMap<Stage, ([u64; 2], u64)>,
}

impl<G: PersistenceGateway> TournamentCoordinator<G, NullObserver> {
    pub fn new(gateway: G, cancel: CancellationFlag) -> Self {
        Self::with_observer(gateway, NullObserver, cancel)
    }
}

impl<G: PersistenceGateway, O: TournamentObserver> TournamentCoordinator<G, O> {
    pub fn with_observer(gateway: G, observer: O, cancel: CancellationFlag) -> Self {
        Self {
            gateway,
            observer,
            cancel,
            session: None,
            created: HashMap::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn cancel_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn tournament_id(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.tournament_id)
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.session.as_ref().and_then(|s| s.bracket.current())
    }

    /// Bracket matches created so far, in creation order
    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        self.session.as_ref().map(Session::schedule).unwrap_or_default()
    }

    /// Register four players and create both semifinals.
    ///
    /// Names are validated before anything is sent to the gateway. Returns the
    /// first stage to offer.
    pub async fn start(&mut self, names: &[&str]) -> Result<NextStep, TournamentError> {
        if names.len() != 4 {
            return Err(TournamentError::PlayerCount(names.len()));
        }
        let aliases = names
            .iter()
            .map(|name| validate_alias(name))
            .collect::<Result<Vec<_>, _>>()?;

        self.cancel.reset();
        self.session = None;
        self.created.clear();

        self.checkpoint()?;
        let tournament_id = self.gateway.create_tournament().await?;
        log::info!("tournament {tournament_id} created");

        let mut ids = [0u64; 4];
        let mut names_by_id = HashMap::new();
        for (slot, alias) in ids.iter_mut().zip(aliases) {
            self.checkpoint()?;
            let id = self.gateway.create_player(&alias).await?;
            self.checkpoint()?;
            self.gateway.add_player_to_tournament(tournament_id, id).await?;
            *slot = id;
            names_by_id.insert(id, alias);
        }

        self.checkpoint()?;
        self.gateway.activate_tournament(tournament_id).await?;

        for secs_left in (1..=COUNTDOWN_SECS).rev() {
            self.checkpoint()?;
            self.observer.countdown(secs_left);
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        let mut bracket = Bracket::new(ids);
        for stage in [Stage::SemiFinal1, Stage::SemiFinal2] {
            self.create_stage(tournament_id, &mut bracket, stage).await?;
        }

        let session = Session {
            tournament_id,
            bracket,
            aliases: names_by_id,
        };
        self.observer.show_schedule(&session.schedule());
        self.session = Some(session);
        self.created.clear();
        log::info!("tournament {tournament_id} semifinals scheduled");
        Ok(NextStep::Offer(Stage::SemiFinal1))
    }

    /// The match for the current stage, ready to hand to a simulation
    pub fn next_match(&self) -> Result<MatchAssignment, TournamentError> {
        let session = self.session.as_ref().ok_or(TournamentError::NoTournament)?;
        let stage = session.bracket.current().ok_or(TournamentError::NoTournament)?;
        let slot = session
            .bracket
            .slot(stage)
            .ok_or(crate::error::BracketError::Unassigned(stage))?;
        Ok(MatchAssignment {
            tournament_id: session.tournament_id,
            stage,
            match_id: slot.match_id,
            players: slot.players.iter().map(|id| session.player(*id)).collect(),
        })
    }

    /// Navigation away: stop at the next checkpoint
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    async fn create_stage(
        &mut self,
        tournament_id: u64,
        bracket: &mut Bracket,
        stage: Stage,
    ) -> Result<u64, TournamentError> {
        let [p1, p2] = bracket
            .pairing(stage)
            .ok_or(crate::error::BracketError::Unpaired(stage))?;
        let match_id = match self.created.get(&stage) {
            Some(&(pairing, match_id)) if pairing == [p1, p2] => {
                log::debug!("reusing match {match_id} for {stage:?}");
                match_id
            }
            _ => {
                self.checkpoint()?;
                let match_id = self
                    .gateway
                    .create_tournament_match(tournament_id, p1, p2, stage.round(), stage.match_number())
                    .await
                    .inspect_err(|e| log::warn!("creating {stage:?} failed: {e}"))?;
                self.created.insert(stage, ([p1, p2], match_id));
                match_id
            }
        };
        bracket.assign(stage, match_id)?;
        Ok(match_id)
    }

    /// Err(Cancelled) once the flag is set, after dropping all tournament state
    fn checkpoint(&mut self) -> Result<(), TournamentError> {
        if !self.cancel.is_cancelled() {
            return Ok(());
        }
        if let Some(session) = self.session.take() {
            log::info!("tournament {} cancelled", session.tournament_id);
        }
        self.created.clear();
        self.observer.clear_schedule();
        Err(TournamentError::Cancelled)
    }

    async fn close_semifinals(&mut self, session: &mut Session) -> Result<NextStep, TournamentError> {
        let tournament_id = session.tournament_id;
        self.create_stage(tournament_id, &mut session.bracket, Stage::ThirdPlace)
            .await?;
        self.create_stage(tournament_id, &mut session.bracket, Stage::Final)
            .await?;

        for id in session.bracket.players() {
            self.checkpoint()?;
            let record = self.gateway.get_player(id).await?;
            session.aliases.insert(id, record.name);
        }
        self.observer.show_schedule(&session.schedule());
        Ok(NextStep::Offer(Stage::ThirdPlace))
    }
}

impl<G: PersistenceGateway, O: TournamentObserver> MatchCompletion for TournamentCoordinator<G, O> {
    /// Advance the bracket with the result of the current match.
    ///
    /// The bracket only moves once every gateway call of the step succeeded;
    /// on error the current stage stays in place.
    async fn on_match_complete(&mut self, outcome: &MatchOutcome) -> Result<NextStep, TournamentError> {
        self.checkpoint()?;
        let mut session = self.session.clone().ok_or(TournamentError::NoTournament)?;
        let stage = session.bracket.current().ok_or(TournamentError::NoTournament)?;
        let expected = session.bracket.slot(stage).map(|s| s.match_id);
        if expected != Some(outcome.match_id) {
            return Err(TournamentError::UnexpectedMatch {
                expected,
                got: outcome.match_id,
            });
        }
        let (Some(winner), Some(loser)) = (outcome.winner(), outcome.loser()) else {
            return Err(TournamentError::UnexpectedMatch {
                expected,
                got: outcome.match_id,
            });
        };
        let result = StageResult {
            winner: winner.id,
            loser: loser.id,
        };
        let phase = session.bracket.complete(stage, result)?;
        log::info!(
            "tournament {}: {:?} won by {} ({:?})",
            session.tournament_id,
            stage,
            winner.alias,
            outcome.scores
        );

        let step = match phase {
            BracketPhase::Playing(Stage::ThirdPlace) => self.close_semifinals(&mut session).await?,
            BracketPhase::Playing(next) => NextStep::Offer(next),
            BracketPhase::Done => {
                let champion = session.player(winner.id);
                self.observer.champion(&champion);
                self.observer.clear_schedule();
                self.session = None;
                self.created.clear();
                log::info!("tournament {} champion {}", session.tournament_id, champion.alias);
                return Ok(NextStep::Champion(champion));
            }
        };

        self.checkpoint()?;
        self.session = Some(session);
        self.created.clear();
        Ok(step)
    }
}
