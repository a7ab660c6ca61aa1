//! Choosing which slot a competitor plays next.
//!
//! Plain `sample_eligible_slot` draws uniformly from the tier band. The
//! contest picker layered on top keeps rotation fresh: characters that have
//! not been placed yet are introduced first while the band still has room,
//! and recently played slots sit out a number of rounds.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ledger::{RankingLedger, Slot};
use crate::types::SlotId;

/// Resolved contests a slot sits out after being played.
pub const DEFAULT_BENCH_ROUNDS: usize = 30;

/// How much the bench shrinks each time it leaves no candidates.
pub const DEFAULT_BENCH_STEP: usize = 5;

/// What the picker needs to know about the rivalry's recent history.
#[derive(Debug, Clone, Copy)]
pub struct SamplingContext<'a> {
    /// This ledger's slot in the contest currently in progress, if any
    pub current_slot: Option<SlotId>,
    /// This ledger's slots in resolved contests, newest first
    pub recent_slots: &'a [SlotId],
    pub bench_rounds: usize,
    pub bench_step: usize,
}

impl<'a> SamplingContext<'a> {
    pub fn new(current_slot: Option<SlotId>, recent_slots: &'a [SlotId]) -> Self {
        Self {
            current_slot,
            recent_slots,
            bench_rounds: DEFAULT_BENCH_ROUNDS,
            bench_step: DEFAULT_BENCH_STEP,
        }
    }
}

impl RankingLedger {
    /// Pick the slot to field in the next contest.
    pub fn sample_contest_slot<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        context: &SamplingContext<'_>,
    ) -> Option<&Slot> {
        let eligible = self.eligible_slots();
        if eligible.is_empty() {
            return self.slots.choose(rng);
        }

        let positioned_in_band = eligible.iter().filter(|slot| slot.is_positioned()).count();
        if positioned_in_band < self.layout.slots_per_tier() {
            let unplaced: Vec<&Slot> = self.slots.iter().filter(|s| !s.is_positioned()).collect();
            if !unplaced.is_empty() {
                let fresh = without(&unplaced, context.current_slot.as_slice());
                let pool = if fresh.is_empty() { unplaced } else { fresh };
                return pool.choose(rng).copied();
            }
        }

        let mut bench_rounds = context.bench_rounds;
        let step = context.bench_step.max(1);
        while bench_rounds > 0 {
            let recent = &context.recent_slots[..bench_rounds.min(context.recent_slots.len())];
            let mut benched: Vec<SlotId> = recent.to_vec();
            benched.extend(context.current_slot);

            let candidates = without(&eligible, &benched);
            if !candidates.is_empty() {
                return candidates.choose(rng).copied();
            }
            bench_rounds = bench_rounds.saturating_sub(step);
        }

        let candidates = without(&eligible, context.current_slot.as_slice());
        let pool = if candidates.is_empty() { eligible } else { candidates };
        pool.choose(rng).copied()
    }
}

fn without<'s>(slots: &[&'s Slot], excluded: &[SlotId]) -> Vec<&'s Slot> {
    slots
        .iter()
        .filter(|slot| !excluded.contains(&slot.id))
        .copied()
        .collect()
}

#[cfg(test)]
#[path = "sampling_tests.rs"]
mod sampling_tests;
