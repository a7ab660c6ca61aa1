//! Contests: one match between a slot from each ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::rivalry::{Participant, Rivalry, Side};
use crate::types::{ContestId, RivalryId, SlotId, MAX_STOCKS};

/// Tie-break outcome of an odd-stock contest, stored so it can be reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Bias {
    /// The winner took the extra move down
    WinnerDropped,
    /// No extra move was made
    Even,
    /// The loser took the extra move up
    LoserClimbed,
}

impl From<Bias> for i8 {
    fn from(bias: Bias) -> Self {
        match bias {
            Bias::WinnerDropped => -1,
            Bias::Even => 0,
            Bias::LoserClimbed => 1,
        }
    }
}

impl TryFrom<i8> for Bias {
    type Error = String;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            -1 => Ok(Bias::WinnerDropped),
            0 => Ok(Bias::Even),
            1 => Ok(Bias::LoserClimbed),
            other => Err(format!("invalid bias {}", other)),
        }
    }
}

/// Slot indices of a contest's participants within their ledgers.
///
/// Only valid until either ledger's slots are reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestBinding {
    pub slot_a: usize,
    pub slot_b: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: ContestId,
    pub rivalry_id: RivalryId,
    pub slot_a_id: SlotId,
    pub slot_b_id: SlotId,
    /// Stock difference, positive when side A won. `None` until resolved.
    result: Option<i8>,
    #[serde(default)]
    bias: Option<Bias>,
    /// Whether the loser was stuck at standing 0 during the cycle move.
    /// Absent on records written before the flag existed.
    #[serde(default)]
    cycle_blocked: Option<bool>,
    /// Number of shared prestige cycles removed after the adjustment
    #[serde(default)]
    prestige_cancelled: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contest {
    pub fn new(rivalry_id: RivalryId, slot_a_id: SlotId, slot_b_id: SlotId) -> Self {
        let now = Utc::now();
        Self {
            id: ContestId::new(),
            rivalry_id,
            slot_a_id,
            slot_b_id,
            result: None,
            bias: None,
            cycle_blocked: None,
            prestige_cancelled: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the outcome. Only allowed once; the magnitude may not exceed 3.
    pub fn resolve(&mut self, result: i32) -> Result<()> {
        if self.result.is_some() {
            return Err(Error::AlreadyResolved);
        }
        if result.unsigned_abs() > MAX_STOCKS as u32 {
            return Err(Error::ResultOutOfRange(result));
        }
        self.result = Some(result as i8);
        self.touch();
        Ok(())
    }

    pub fn result(&self) -> Option<i8> {
        self.result
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }

    pub fn bias(&self) -> Option<Bias> {
        self.bias
    }

    pub fn cycle_blocked(&self) -> Option<bool> {
        self.cycle_blocked
    }

    pub fn prestige_cancelled(&self) -> u32 {
        self.prestige_cancelled
    }

    /// Magnitude of the result, 0 when unresolved.
    pub fn stocks(&self) -> u32 {
        self.result.map_or(0, |r| r.unsigned_abs() as u32)
    }

    /// `None` while unresolved or drawn.
    pub fn winner_side(&self) -> Option<Side> {
        match self.result? {
            r if r > 0 => Some(Side::A),
            r if r < 0 => Some(Side::B),
            _ => None,
        }
    }

    pub fn loser_side(&self) -> Option<Side> {
        self.winner_side().map(Side::other)
    }

    pub fn slot_id(&self, side: Side) -> SlotId {
        match side {
            Side::A => self.slot_a_id,
            Side::B => self.slot_b_id,
        }
    }

    /// Find both participating slots in the rivalry's ledgers.
    pub fn bind_to_rivalry(&self, rivalry: &Rivalry) -> Option<ContestBinding> {
        let slot_a = rivalry
            .ledger(Side::A)
            .and_then(|ledger| ledger.slot_index(self.slot_a_id));
        let slot_b = rivalry
            .ledger(Side::B)
            .and_then(|ledger| ledger.slot_index(self.slot_b_id));

        match (slot_a, slot_b) {
            (Some(slot_a), Some(slot_b)) => Some(ContestBinding { slot_a, slot_b }),
            _ => {
                warn!(contest = %self.id, "failed to find slots for contest");
                None
            }
        }
    }

    pub fn participant<'r>(&self, rivalry: &'r Rivalry, side: Side) -> Option<Participant<'r>> {
        let ledger = rivalry.ledger(side)?;
        let slot = ledger.slot(self.slot_id(side))?;
        Some(Participant {
            side,
            user_id: rivalry.user_id(side),
            ledger,
            slot,
        })
    }

    pub fn winner<'r>(&self, rivalry: &'r Rivalry) -> Option<Participant<'r>> {
        self.participant(rivalry, self.winner_side()?)
    }

    pub fn loser<'r>(&self, rivalry: &'r Rivalry) -> Option<Participant<'r>> {
        self.participant(rivalry, self.loser_side()?)
    }

    pub(crate) fn record_adjustment(
        &mut self,
        bias: Bias,
        cycle_blocked: Option<bool>,
        prestige_cancelled: u32,
    ) {
        self.bias = Some(bias);
        self.cycle_blocked = cycle_blocked;
        self.prestige_cancelled = prestige_cancelled;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[path = "contest_tests.rs"]
mod contest_tests;
