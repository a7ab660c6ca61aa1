//! Contest sessions: pick participants, apply results, undo them
//!
//! A session owns one rivalry and its contest history. Commands take
//! `&mut self`, so a session is the single writer for its rivalry.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tier_core::{
    adjust, reverse, Adjustment, CharacterId, Contest, ContestId, Rivalry, SamplingContext, Side,
    SlotId, SlotMove, SlotSnapshot, TieBreaker, UserId,
};

use crate::config::SessionConfig;
use crate::error::{Error, Result};

/// A playable character of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Contests played by established slots of this character, across both ledgers
    #[serde(default)]
    pub contest_count: u32,
    #[serde(default)]
    pub win_count: u32,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            contest_count: 0,
            win_count: 0,
        }
    }

    pub fn record_contest(&mut self, won: bool) {
        self.contest_count += 1;
        if won {
            self.win_count += 1;
        }
    }

    pub fn revert_contest(&mut self, won: bool) {
        self.contest_count = self.contest_count.saturating_sub(1);
        if won {
            self.win_count = self.win_count.saturating_sub(1);
        }
    }
}

/// A slot placed for the first time while resolving a contest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub side: Side,
    pub slot_id: SlotId,
    pub position: i32,
}

/// Everything needed to undo one resolved contest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestRecord {
    pub contest_id: ContestId,
    pub adjustment: Adjustment,
    pub placements: Vec<Placement>,
    pub moves: Vec<(Side, SlotMove)>,
    /// Sides whose slot was past the provisional threshold, and so counted
    /// toward the character's stats
    #[serde(default)]
    pub counted: Vec<Side>,
    /// Slots of ledgers A and B before the contest was applied
    pub before_a: Vec<SlotSnapshot>,
    pub before_b: Vec<SlotSnapshot>,
    pub resolved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub config: SessionConfig,
    /// Display names of users A and B
    pub names: [String; 2],
    pub characters: Vec<Character>,
    pub rivalry: Rivalry,
    /// Every contest of the rivalry, oldest first
    pub contests: Vec<Contest>,
    pub current_contest_id: Option<ContestId>,
    /// Resolved contests, oldest first
    pub history: Vec<ContestRecord>,
}

impl Session {
    /// Begin a rivalry: both ledgers start at standing 0 with nothing placed.
    pub fn start(
        name_a: impl Into<String>,
        name_b: impl Into<String>,
        characters: Vec<Character>,
        config: SessionConfig,
    ) -> Self {
        let mut rivalry = Rivalry::new(UserId::new(), UserId::new());
        let roster: Vec<CharacterId> = characters.iter().map(|c| c.id).collect();
        rivalry.begin(&roster, config.layout());
        info!(rivalry = %rivalry.id, characters = roster.len(), "started rivalry");

        Self {
            config,
            names: [name_a.into(), name_b.into()],
            characters,
            rivalry,
            contests: Vec::new(),
            current_contest_id: None,
            history: Vec::new(),
        }
    }

    /// A generic roster of `count` numbered characters.
    pub fn numbered_roster(count: usize) -> Vec<Character> {
        (1..=count)
            .map(|n| Character::new(format!("Fighter {}", n)))
            .collect()
    }

    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::A => &self.names[0],
            Side::B => &self.names[1],
        }
    }

    pub fn character_name(&self, id: CharacterId) -> &str {
        self.characters
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    }

    pub fn current_contest(&self) -> Option<&Contest> {
        let id = self.current_contest_id?;
        self.contests.iter().find(|c| c.id == id)
    }

    pub fn contest(&self, id: ContestId) -> Option<&Contest> {
        self.contests.iter().find(|c| c.id == id)
    }

    fn contest_index(&self, id: ContestId) -> Option<usize> {
        self.contests.iter().position(|c| c.id == id)
    }

    /// One side's slots in resolved contests, newest first.
    pub fn recent_slots(&self, side: Side) -> Vec<SlotId> {
        self.contests
            .iter()
            .rev()
            .filter(|c| c.is_resolved() && Some(c.id) != self.current_contest_id)
            .map(|c| c.slot_id(side))
            .collect()
    }

    /// Create the next contest by sampling a slot for each side.
    pub fn next_contest<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Contest> {
        if let Some(current) = self.current_contest() {
            return Err(Error::ContestInProgress(current.id));
        }

        let slot_a = self.pick_slot(Side::A, None, rng)?;
        let slot_b = self.pick_slot(Side::B, None, rng)?;
        let contest = Contest::new(self.rivalry.id, slot_a, slot_b);
        info!(contest = %contest.id, "created contest");

        self.current_contest_id = Some(contest.id);
        self.contests.push(contest);
        self.current_contest().ok_or(Error::NoCurrentContest)
    }

    /// Swap one side's character in the pending contest for another pick.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, side: Side, rng: &mut R) -> Result<SlotId> {
        let current = self.current_contest().ok_or(Error::NoCurrentContest)?;
        let (id, avoid) = (current.id, current.slot_id(side));
        let slot = self.pick_slot(side, Some(avoid), rng)?;

        let index = self.contest_index(id).ok_or(Error::NoCurrentContest)?;
        let contest = &mut self.contests[index];
        match side {
            Side::A => contest.slot_a_id = slot,
            Side::B => contest.slot_b_id = slot,
        }
        debug!(contest = %id, %side, %slot, "shuffled slot");
        Ok(slot)
    }

    fn pick_slot<R: Rng + ?Sized>(
        &self,
        side: Side,
        current_slot: Option<SlotId>,
        rng: &mut R,
    ) -> Result<SlotId> {
        let ledger = self.rivalry.ledger(side).ok_or(Error::MissingLedger)?;
        let recent = self.recent_slots(side);
        let context = SamplingContext {
            current_slot,
            recent_slots: &recent,
            bench_rounds: self.config.bench_rounds,
            bench_step: self.config.bench_step,
        };
        ledger
            .sample_contest_slot(rng, &context)
            .map(|slot| slot.id)
            .ok_or(Error::NoEligibleSlot(side))
    }

    /// Apply a result to the pending contest.
    ///
    /// Places first-time participants relative to their opponent, adjusts
    /// standings, then moves both slots by `result * steps_per_stock`,
    /// stopping at the roster edges. Characters whose slot is past the
    /// provisional threshold also have the contest added to their stats.
    pub fn resolve_current(
        &mut self,
        result: i32,
        nudge: Option<i8>,
        coin: &mut impl TieBreaker,
    ) -> Result<&ContestRecord> {
        if result == 0 {
            return Err(Error::InvalidArgument("a contest needs a winner".into()));
        }
        let id = self.current_contest_id.ok_or(Error::NoCurrentContest)?;
        let index = self.contest_index(id).ok_or(Error::NoCurrentContest)?;
        self.contests[index]
            .bind_to_rivalry(&self.rivalry)
            .ok_or(Error::MissingLedger)?;
        self.contests[index].resolve(result)?;

        let before_a = self.snapshot(Side::A)?;
        let before_b = self.snapshot(Side::B)?;
        let counted = self.established_sides(index)?;
        let placements = self.place_newcomers(index)?;

        let adjustment = adjust(&mut self.rivalry, &mut self.contests[index], nudge, coin)
            .ok_or(Error::NotApplied(id))?;

        let steps = result.saturating_mul(self.config.steps_per_stock);
        let mut moves = Vec::with_capacity(2);
        for (side, steps) in [(Side::A, -steps), (Side::B, steps)] {
            let slot_id = self.contests[index].slot_id(side);
            let won = self.contests[index].winner_side() == Some(side);
            let ledger = self.rivalry.ledger_mut(side).ok_or(Error::MissingLedger)?;
            let from = ledger
                .slot(slot_id)
                .ok_or(tier_core::Error::UnknownSlot(slot_id))?
                .effective_position();
            // stop at the roster edges so a placed ledger stays dense
            let steps = ledger.layout.clamp(from.saturating_add(steps)) - from;
            let slot_move = ledger.move_slot(from, steps, false)?;
            if let Some(slot) = ledger.slot_mut(slot_id) {
                slot.record_contest(won);
            }
            moves.push((side, slot_move));
        }

        for &side in &counted {
            let contest = &self.contests[index];
            let (won, slot_id) = (contest.winner_side() == Some(side), contest.slot_id(side));
            self.character_stats(side, slot_id, |character| character.record_contest(won));
        }

        info!(
            contest = %id,
            result,
            standings = ?adjustment.after,
            "resolved contest"
        );

        self.current_contest_id = None;
        self.history.push(ContestRecord {
            contest_id: id,
            adjustment,
            placements,
            moves,
            counted,
            before_a,
            before_b,
            resolved_at: Utc::now(),
        });
        self.history.last().ok_or(Error::NothingToUndo)
    }

    /// Sides whose participant is past the provisional threshold before the contest.
    fn established_sides(&self, index: usize) -> Result<Vec<Side>> {
        let threshold = self.config.provisional_threshold;
        let mut sides = Vec::new();
        for side in [Side::A, Side::B] {
            let slot_id = self.contests[index].slot_id(side);
            let slot = self
                .rivalry
                .ledger(side)
                .ok_or(Error::MissingLedger)?
                .slot(slot_id)
                .ok_or(tier_core::Error::UnknownSlot(slot_id))?;
            if !slot.is_provisional(threshold) {
                sides.push(side);
            }
        }
        Ok(sides)
    }

    /// Apply `update` to the character behind one of `side`'s slots.
    fn character_stats(&mut self, side: Side, slot_id: SlotId, update: impl FnOnce(&mut Character)) {
        let Some(character_id) = self
            .rivalry
            .ledger(side)
            .and_then(|ledger| ledger.slot(slot_id))
            .map(|slot| slot.character_id)
        else {
            return;
        };
        if let Some(character) = self.characters.iter_mut().find(|c| c.id == character_id) {
            update(character);
        }
    }

    /// Give unplaced participants a starting position next to their opponent.
    fn place_newcomers(&mut self, index: usize) -> Result<Vec<Placement>> {
        let contest = &self.contests[index];
        let (Some(winner), Some(loser)) = (contest.winner_side(), contest.loser_side()) else {
            return Ok(Vec::new());
        };
        let offset = contest.stocks() as i32 * self.config.position_bias;
        let (winner_slot, loser_slot) = (contest.slot_id(winner), contest.slot_id(loser));

        let mut placements = Vec::new();
        // winners land above the opponent, losers below
        for (side, slot_id, opponent_side, opponent_slot, offset) in [
            (winner, winner_slot, loser, loser_slot, -offset),
            (loser, loser_slot, winner, winner_slot, offset),
        ] {
            let opponent_position = self
                .rivalry
                .ledger(opponent_side)
                .and_then(|l| l.slot(opponent_slot))
                .and_then(|s| s.position)
                .unwrap_or(self.config.unknown_midpoint);

            let ledger = self.rivalry.ledger_mut(side).ok_or(Error::MissingLedger)?;
            let already_placed = ledger
                .slot(slot_id)
                .ok_or(tier_core::Error::UnknownSlot(slot_id))?
                .is_positioned();
            if already_placed {
                continue;
            }

            let position = ledger.place_unpositioned_slot(slot_id, opponent_position + offset)?;
            debug!(%side, slot = %slot_id, opponent_position, position, "placed newcomer");
            placements.push(Placement {
                side,
                slot_id,
                position,
            });
        }
        Ok(placements)
    }

    /// Undo the most recent resolved contest and drop it.
    ///
    /// A pending contest is discarded first, since it has not changed anything.
    pub fn undo_last(&mut self) -> Result<ContestId> {
        let contest_id = self
            .history
            .last()
            .map(|record| record.contest_id)
            .ok_or(Error::NothingToUndo)?;
        let index = self.contest_index(contest_id).ok_or(Error::NothingToUndo)?;
        if !reverse(&mut self.rivalry, &self.contests[index]) {
            return Err(Error::NotApplied(contest_id));
        }

        let record = self.history.pop().ok_or(Error::NothingToUndo)?;
        let contest = self.contests.remove(index);
        if let Some(pending) = self.current_contest_id.take() {
            self.contests.retain(|c| c.id != pending);
        }

        for &side in &record.counted {
            let won = contest.winner_side() == Some(side);
            self.character_stats(side, contest.slot_id(side), |character| {
                character.revert_contest(won)
            });
        }

        for side in [Side::A, Side::B] {
            let placed = record.placements.iter().any(|p| p.side == side);
            let exact_move = record
                .moves
                .iter()
                .find(|(s, _)| *s == side)
                .map(|(_, m)| *m)
                .filter(|m| m.valid && !m.clamped());
            let won = contest.winner_side() == Some(side);
            let before = match side {
                Side::A => &record.before_a,
                Side::B => &record.before_b,
            };

            let ledger = self.rivalry.ledger_mut(side).ok_or(Error::MissingLedger)?;
            // moving back saturates like any other move, so the origin must be in range,
            // and a manual reorder since then may have put another slot at the target
            let exact_move = exact_move.filter(|m| {
                ledger.layout.clamp(m.from) == m.from
                    && ledger.slot_at_position(m.target).map(|slot| slot.id) == Some(m.slot_id)
            });
            match exact_move {
                Some(slot_move) if !placed => {
                    ledger.move_slot(slot_move.target, slot_move.from - slot_move.target, false)?;
                    if let Some(slot) = ledger.slot_mut(slot_move.slot_id) {
                        slot.revert_contest(won);
                    }
                }
                _ => ledger.restore(before),
            }
        }

        info!(contest = %contest.id, standings = ?self.rivalry.standings(), "undid contest");
        Ok(contest.id)
    }

    /// Move one side's slot from `from` to `to` by hand, without touching stats.
    ///
    /// Returns the slots that now differ from the last save.
    pub fn reorder(&mut self, side: Side, from: i32, to: i32) -> Result<Vec<SlotSnapshot>> {
        let ledger = self.rivalry.ledger_mut(side).ok_or(Error::MissingLedger)?;
        let max = ledger.layout.max_position();
        if !(0..=max).contains(&to) {
            return Err(Error::InvalidArgument(format!(
                "position {} is outside 0..={}",
                to, max
            )));
        }

        let slot_move = ledger.move_slot(from, to.saturating_sub(from), false)?;
        info!(%side, slot = %slot_move.slot_id, from, to, "reordered slot");
        Ok(ledger.changed_slots().into_iter().map(|slot| slot.snapshot()).collect())
    }

    /// Slot steps the participants of `contest` move by.
    pub fn fighter_moves(&self, contest: &Contest) -> u32 {
        contest.stocks() * self.config.steps_per_stock.unsigned_abs()
    }

    /// Slots edited since the last save, across both ledgers.
    pub fn pending_changes(&self) -> usize {
        [Side::A, Side::B]
            .iter()
            .filter_map(|&side| self.rivalry.ledger(side))
            .map(|ledger| ledger.changed_slots().len())
            .sum()
    }

    fn snapshot(&self, side: Side) -> Result<Vec<SlotSnapshot>> {
        Ok(self
            .rivalry
            .ledger(side)
            .ok_or(Error::MissingLedger)?
            .snapshot())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
