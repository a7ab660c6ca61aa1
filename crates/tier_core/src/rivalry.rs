//! The rivalry aggregate: two users and their ledgers, addressed by side.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::{RankingLedger, Slot};
use crate::types::{CharacterId, RivalryId, TierLayout, UserId};

/// Which half of a rivalry a ledger, slot or user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// One side of a bound contest.
#[derive(Debug, Clone, Copy)]
pub struct Participant<'r> {
    pub side: Side,
    pub user_id: UserId,
    pub ledger: &'r RankingLedger,
    pub slot: &'r Slot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rivalry {
    pub id: RivalryId,
    pub user_a_id: UserId,
    pub user_b_id: UserId,
    /// Missing until the rivalry has begun
    pub ledger_a: Option<RankingLedger>,
    pub ledger_b: Option<RankingLedger>,
}

impl Rivalry {
    /// A pending rivalry without ledgers.
    pub fn new(user_a_id: UserId, user_b_id: UserId) -> Self {
        Self {
            id: RivalryId::new(),
            user_a_id,
            user_b_id,
            ledger_a: None,
            ledger_b: None,
        }
    }

    /// Create both ledgers with the same roster, at standing 0 and unplaced.
    pub fn begin(&mut self, roster: &[CharacterId], layout: TierLayout) {
        self.ledger_a = Some(RankingLedger::new(
            self.id,
            self.user_a_id,
            roster.iter().copied(),
            layout.clone(),
        ));
        self.ledger_b = Some(RankingLedger::new(
            self.id,
            self.user_b_id,
            roster.iter().copied(),
            layout,
        ));
    }

    pub fn user_id(&self, side: Side) -> UserId {
        match side {
            Side::A => self.user_a_id,
            Side::B => self.user_b_id,
        }
    }

    pub fn ledger(&self, side: Side) -> Option<&RankingLedger> {
        match side {
            Side::A => self.ledger_a.as_ref(),
            Side::B => self.ledger_b.as_ref(),
        }
    }

    pub fn ledger_mut(&mut self, side: Side) -> Option<&mut RankingLedger> {
        match side {
            Side::A => self.ledger_a.as_mut(),
            Side::B => self.ledger_b.as_mut(),
        }
    }

    /// Both ledgers mutably, ordered `(side, side.other())`.
    pub fn ledgers_mut(&mut self, side: Side) -> Option<(&mut RankingLedger, &mut RankingLedger)> {
        let (a, b) = (self.ledger_a.as_mut()?, self.ledger_b.as_mut()?);
        Some(match side {
            Side::A => (a, b),
            Side::B => (b, a),
        })
    }

    pub fn has_ledgers(&self) -> bool {
        self.ledger_a.is_some() && self.ledger_b.is_some()
    }

    /// Standings of both ledgers, `(A, B)`.
    pub fn standings(&self) -> (Option<u32>, Option<u32>) {
        (
            self.ledger_a.as_ref().and_then(|l| l.standing),
            self.ledger_b.as_ref().and_then(|l| l.standing),
        )
    }

    /// Signed prestige advantage of side A (positive = A carries more prestige).
    pub fn prestige_gap(&self) -> i64 {
        let prestige = |ledger: Option<&RankingLedger>| ledger.map_or(0, |l| l.prestige() as i64);
        prestige(self.ledger_a.as_ref()) - prestige(self.ledger_b.as_ref())
    }
}
