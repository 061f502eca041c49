//! Bracket state machine
//!
//! Semifinal 1, semifinal 2, third-place, final; always in that order.
//! Semifinal winners meet in the final, losers in the third-place match.

use proto::Round;

use crate::error::BracketError;

/// One of the four bracket matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SemiFinal1,
    SemiFinal2,
    ThirdPlace,
    Final,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [
        Stage::SemiFinal1,
        Stage::SemiFinal2,
        Stage::ThirdPlace,
        Stage::Final,
    ];

    pub fn round(self) -> Round {
        match self {
            Stage::SemiFinal1 | Stage::SemiFinal2 => Round::SemiFinal,
            Stage::ThirdPlace => Round::ThirdPlace,
            Stage::Final => Round::Final,
        }
    }

    /// Match number stored with the gateway; the final is created as 3, third-place as 4
    pub fn match_number(self) -> u8 {
        match self {
            Stage::SemiFinal1 => 1,
            Stage::SemiFinal2 => 2,
            Stage::Final => 3,
            Stage::ThirdPlace => 4,
        }
    }
}

/// Bracket states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketPhase {
    Playing(Stage),
    Done,
}

/// A stage's match and, once played, its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSlot {
    pub stage: Stage,
    pub match_id: u64,
    pub players: [u64; 2],
    pub result: Option<StageResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageResult {
    pub winner: u64,
    pub loser: u64,
}

#[derive(Debug, Clone)]
pub struct Bracket {
    players: [u64; 4],
    phase: BracketPhase,
    slots: Vec<StageSlot>,
}

impl Bracket {
    pub fn new(players: [u64; 4]) -> Self {
        Self {
            players,
            phase: BracketPhase::Playing(Stage::SemiFinal1),
            slots: Vec::with_capacity(4),
        }
    }

    pub fn players(&self) -> [u64; 4] {
        self.players
    }

    pub fn phase(&self) -> BracketPhase {
        self.phase
    }

    /// Stage being played, if the bracket is not finished
    pub fn current(&self) -> Option<Stage> {
        match self.phase {
            BracketPhase::Playing(stage) => Some(stage),
            BracketPhase::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == BracketPhase::Done
    }

    pub fn slot(&self, stage: Stage) -> Option<&StageSlot> {
        self.slots.iter().find(|s| s.stage == stage)
    }

    pub fn slots(&self) -> &[StageSlot] {
        &self.slots
    }

    /// Who meets in `stage`; later stages need both semifinals decided
    pub fn pairing(&self, stage: Stage) -> Option<[u64; 2]> {
        let [p1, p2, p3, p4] = self.players;
        match stage {
            Stage::SemiFinal1 => Some([p1, p2]),
            Stage::SemiFinal2 => Some([p3, p4]),
            Stage::ThirdPlace | Stage::Final => {
                let first = self.slot(Stage::SemiFinal1)?.result?;
                let second = self.slot(Stage::SemiFinal2)?.result?;
                if stage == Stage::Final {
                    Some([first.winner, second.winner])
                } else {
                    Some([first.loser, second.loser])
                }
            }
        }
    }

    /// Attach the gateway match created for `stage`
    pub fn assign(&mut self, stage: Stage, match_id: u64) -> Result<(), BracketError> {
        if self.slot(stage).is_some() {
            return Err(BracketError::AlreadyAssigned(stage));
        }
        let players = self.pairing(stage).ok_or(BracketError::Unpaired(stage))?;
        self.slots.push(StageSlot {
            stage,
            match_id,
            players,
            result: None,
        });
        Ok(())
    }

    /// Check if `stage` may complete now
    pub fn can_complete(&self, stage: Stage) -> bool {
        self.next_phase(stage).is_some()
    }

    /// Record the result of the current stage and move on
    pub fn complete(&mut self, stage: Stage, result: StageResult) -> Result<BracketPhase, BracketError> {
        let next = self.next_phase(stage).ok_or(BracketError::OutOfOrder {
            phase: self.phase,
            stage,
        })?;
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.stage == stage)
            .ok_or(BracketError::Unassigned(stage))?;
        slot.result = Some(result);
        self.phase = next;
        Ok(next)
    }

    fn next_phase(&self, stage: Stage) -> Option<BracketPhase> {
        match (self.phase, stage) {
            (BracketPhase::Playing(Stage::SemiFinal1), Stage::SemiFinal1) => {
                Some(BracketPhase::Playing(Stage::SemiFinal2))
            }
            (BracketPhase::Playing(Stage::SemiFinal2), Stage::SemiFinal2) => {
                Some(BracketPhase::Playing(Stage::ThirdPlace))
            }
            (BracketPhase::Playing(Stage::ThirdPlace), Stage::ThirdPlace) => {
                Some(BracketPhase::Playing(Stage::Final))
            }
            (BracketPhase::Playing(Stage::Final), Stage::Final) => Some(BracketPhase::Done),
            _ => None,
        }
    }
}
