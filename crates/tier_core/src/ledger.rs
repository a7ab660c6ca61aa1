//! Ranking ledgers: one competitor's slots plus their standing.
//!
//! `standing` packs two values together: the tier (`standing % 7`, 0 = S)
//! and the prestige cycle (`standing / 7`). Moving *down* a tier means
//! incrementing the standing, which is what happens to a winner.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{
    CharacterId, LedgerId, RivalryId, SlotId, Tier, TierLayout, UserId, PROVISIONAL_THRESHOLD,
    TIER_COUNT,
};

/// One character's placement inside a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub ledger_id: LedgerId,
    pub character_id: CharacterId,
    /// Roster position, `None` until the character has been placed
    pub position: Option<i32>,
    pub contest_count: u32,
    pub win_count: u32,
}

impl Slot {
    pub fn new(ledger_id: LedgerId, character_id: CharacterId, position: Option<i32>) -> Self {
        Self {
            id: SlotId::new(),
            ledger_id,
            character_id,
            position,
            contest_count: 0,
            win_count: 0,
        }
    }

    pub fn is_positioned(&self) -> bool {
        self.position.is_some()
    }

    /// Position used for ordering and comparisons; unset counts as 0.
    pub fn effective_position(&self) -> i32 {
        self.position.unwrap_or(0)
    }

    /// Whether the slot has played too few contests to count toward global stats.
    pub fn is_provisional(&self, threshold: u32) -> bool {
        self.contest_count < threshold
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        SlotSnapshot {
            id: self.id,
            position: self.position,
            contest_count: self.contest_count,
            win_count: self.win_count,
        }
    }
}

/// The mutable fields of a slot, as last loaded or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub id: SlotId,
    pub position: Option<i32>,
    pub contest_count: u32,
    pub win_count: u32,
}

/// A competitor's ordered slot collection within one rivalry.
///
/// Deserializing goes through `from_parts`, so a loaded ledger starts with
/// its stored slots as the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "LedgerRecord")]
pub struct RankingLedger {
    pub id: LedgerId,
    pub rivalry_id: RivalryId,
    pub user_id: UserId,
    /// `None` while the competitor is not yet participating
    pub standing: Option<u32>,
    pub layout: TierLayout,
    pub slots: Vec<Slot>,
    /// State as last loaded or persisted, used for change detection
    #[serde(skip)]
    pub(crate) baseline: Vec<SlotSnapshot>,
}

#[derive(Deserialize)]
struct LedgerRecord {
    id: LedgerId,
    rivalry_id: RivalryId,
    user_id: UserId,
    standing: Option<u32>,
    layout: TierLayout,
    slots: Vec<Slot>,
}

impl From<LedgerRecord> for RankingLedger {
    fn from(record: LedgerRecord) -> Self {
        RankingLedger::from_parts(
            record.id,
            record.rivalry_id,
            record.user_id,
            record.standing,
            record.layout,
            record.slots,
        )
    }
}

impl RankingLedger {
    /// Create a ledger at standing 0 with one unplaced slot per character.
    pub fn new(
        rivalry_id: RivalryId,
        user_id: UserId,
        characters: impl IntoIterator<Item = CharacterId>,
        layout: TierLayout,
    ) -> Self {
        let id = LedgerId::new();
        let slots = characters
            .into_iter()
            .map(|character| Slot::new(id, character, None))
            .collect();
        Self::from_parts(id, rivalry_id, user_id, Some(0), layout, slots)
    }

    /// Rebuild a ledger from stored records. The given slots become the baseline.
    pub fn from_parts(
        id: LedgerId,
        rivalry_id: RivalryId,
        user_id: UserId,
        standing: Option<u32>,
        layout: TierLayout,
        slots: Vec<Slot>,
    ) -> Self {
        let mut ledger = Self {
            id,
            rivalry_id,
            user_id,
            standing,
            layout,
            slots,
            baseline: Vec::new(),
        };
        ledger.mark_persisted();
        ledger
    }

    /// Worsen the standing by one. Fails only when the standing is unset.
    pub fn move_down_a_tier(&mut self) -> bool {
        match self.standing.as_mut() {
            Some(standing) => {
                *standing += 1;
                true
            }
            None => false,
        }
    }

    /// Improve the standing by one. Blocked at 0 and when unset.
    pub fn move_up_a_tier(&mut self) -> bool {
        match self.standing.as_mut() {
            Some(standing) if *standing > 0 => {
                *standing -= 1;
                true
            }
            _ => false,
        }
    }

    /// Tier index, 0 (S) through 6 (F).
    pub fn current_tier(&self) -> usize {
        self.standing.unwrap_or(0) as usize % TIER_COUNT
    }

    pub fn tier(&self) -> Tier {
        Tier::from_index(self.current_tier())
    }

    /// Completed seven-tier cycles.
    pub fn prestige(&self) -> u32 {
        self.standing.unwrap_or(0) / TIER_COUNT as u32
    }

    /// Tier label with prestige marks, e.g. `(B)`, `(B+)`, `(B+3)`.
    pub fn prestige_display(&self) -> String {
        let marks = match self.prestige() {
            0 => String::new(),
            1 => "+".to_string(),
            n => format!("+{}", n),
        };
        format!("({}{})", self.tier(), marks)
    }

    /// True when every slot is placed and positions are exactly `0..total_slots`.
    pub fn is_fully_positioned(&self) -> bool {
        if self.slots.len() != self.layout.total_slots() {
            return false;
        }
        let mut seen = vec![false; self.slots.len()];
        for slot in &self.slots {
            match slot.position {
                Some(p) if p >= 0 && (p as usize) < seen.len() && !seen[p as usize] => {
                    seen[p as usize] = true;
                }
                _ => return false,
            }
        }
        true
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.id == id)
    }

    pub fn slot_index(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    /// Slots in the current tier's position band. Unset positions count as 0.
    pub fn eligible_slots(&self) -> Vec<&Slot> {
        let band = self.layout.band(self.current_tier());
        self.slots
            .iter()
            .filter(|slot| band.contains(&slot.effective_position()))
            .collect()
    }

    /// Uniformly pick one slot from the current tier's band.
    pub fn sample_eligible_slot<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Slot> {
        self.eligible_slots().choose(rng).copied()
    }

    /// Slots still counted as provisional under the default threshold.
    pub fn provisional_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(|slot| slot.is_provisional(PROVISIONAL_THRESHOLD))
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;
