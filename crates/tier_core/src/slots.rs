//! Slot-position engine: reordering, stat tracking and change detection.
//!
//! A ledger runs in one of two modes. In *fully-positioned* mode every slot
//! has a position and the positions are exactly `0..total_slots`; in
//! *sparse* mode some characters have not been placed yet. The modes differ
//! in how an out-of-range move target is handled.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::ledger::{RankingLedger, Slot, SlotSnapshot};
use crate::types::SlotId;

/// What `move_slot` actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMove {
    pub slot_id: SlotId,
    pub from: i32,
    /// `from + steps`, before any clamping
    pub requested: i32,
    /// Position the slot ended up at
    pub target: i32,
    /// False when the target lies outside the roster
    pub valid: bool,
}

impl SlotMove {
    /// Whether the requested target had to be saturated at a roster boundary.
    pub fn clamped(&self) -> bool {
        self.requested != self.target
    }
}

/// Legacy bulk-write record for a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub id: SlotId,
    pub position: i32,
    pub contest_count: u32,
    pub win_count: u32,
}

impl Slot {
    /// Count one contest, and a win when `won`.
    pub fn record_contest(&mut self, won: bool) {
        self.contest_count += 1;
        if won {
            self.win_count += 1;
        }
    }

    /// Undo the counters a tracked move added.
    pub fn revert_contest(&mut self, won: bool) {
        self.contest_count = self.contest_count.saturating_sub(1);
        if won {
            self.win_count = self.win_count.saturating_sub(1);
        }
    }
}

impl RankingLedger {
    /// Move the slot at `from_position` by `steps` (negative = toward S tier).
    ///
    /// Behaves like removing the slot from the ordered roster and inserting
    /// it again at `from_position + steps`: the slots in between shift one
    /// place back toward the origin. With `track_stats`, the slot's contest
    /// count goes up and a move toward the top also counts as a win.
    ///
    /// In sparse mode the target saturates at the roster edges. In
    /// fully-positioned mode an out-of-range target is written as-is and
    /// logged, and the returned move is flagged invalid.
    pub fn move_slot(&mut self, from_position: i32, steps: i32, track_stats: bool) -> Result<SlotMove> {
        let fully_positioned = self.is_fully_positioned();
        let index = self
            .index_at_position(from_position)
            .ok_or(Error::SlotNotFound {
                position: from_position,
            })?;

        let requested = from_position.saturating_add(steps);
        let target = if fully_positioned {
            requested
        } else {
            self.layout.clamp(requested)
        };
        let valid = (0..=self.layout.max_position()).contains(&target);

        let moved_id = self.slots[index].id;
        for slot in self.slots.iter_mut().filter(|slot| slot.id != moved_id) {
            let Some(position) = slot.position.as_mut() else {
                continue;
            };
            if target > from_position && *position > from_position && *position <= target {
                *position -= 1;
            } else if target < from_position && *position >= target && *position < from_position {
                *position += 1;
            }
        }

        let moved = &mut self.slots[index];
        moved.position = Some(target);
        if track_stats {
            moved.record_contest(steps < 0);
        }

        if !valid {
            error!(
                ledger = %self.id,
                slot = %moved_id,
                from = from_position,
                target,
                "INVALID POSITION"
            );
        } else {
            debug!(ledger = %self.id, slot = %moved_id, from = from_position, target, "moved slot");
        }

        self.sort_slots();

        Ok(SlotMove {
            slot_id: moved_id,
            from: from_position,
            requested,
            target,
            valid,
        })
    }

    /// Place a not-yet-positioned slot, pushing everything at or below it down one.
    ///
    /// The position is clamped into the roster. Returns the position used.
    pub fn place_unpositioned_slot(&mut self, slot_id: SlotId, position: i32) -> Result<i32> {
        let position = self.layout.clamp(position);
        if self.slot(slot_id).is_none() {
            return Err(Error::UnknownSlot(slot_id));
        }

        for slot in &mut self.slots {
            if slot.id == slot_id {
                slot.position = Some(position);
            } else if let Some(p) = slot.position.as_mut() {
                if *p >= position {
                    *p += 1;
                }
            }
        }

        debug!(ledger = %self.id, slot = %slot_id, position, "placed slot");
        self.sort_slots();
        Ok(position)
    }

    /// The slot `move_slot` would pick up from `position`.
    pub fn slot_at_position(&self, position: i32) -> Option<&Slot> {
        self.index_at_position(position).map(|index| &self.slots[index])
    }

    /// Assign positions `0..n` following the current slot order.
    pub fn place_in_order(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.position = Some(index as i32);
        }
    }

    /// Overwrite positions and counters from a snapshot. Unknown ids are skipped.
    pub fn restore(&mut self, snapshot: &[SlotSnapshot]) {
        let by_id: HashMap<SlotId, &SlotSnapshot> = snapshot.iter().map(|s| (s.id, s)).collect();
        for slot in &mut self.slots {
            if let Some(saved) = by_id.get(&slot.id) {
                slot.position = saved.position;
                slot.contest_count = saved.contest_count;
                slot.win_count = saved.win_count;
            }
        }
        self.sort_slots();
    }

    pub fn snapshot(&self) -> Vec<SlotSnapshot> {
        self.slots.iter().map(Slot::snapshot).collect()
    }

    /// Record the current slots as persisted.
    pub fn mark_persisted(&mut self) {
        self.baseline = self.snapshot();
    }

    pub fn baseline(&self) -> &[SlotSnapshot] {
        &self.baseline
    }

    /// Slots that differ from the persisted baseline.
    pub fn changed_slots(&self) -> Vec<&Slot> {
        self.changed_slots_since(&self.baseline)
    }

    /// Slots whose position or counters differ from `baseline`.
    /// A slot missing from the baseline counts as changed.
    pub fn changed_slots_since(&self, baseline: &[SlotSnapshot]) -> Vec<&Slot> {
        let by_id: HashMap<SlotId, &SlotSnapshot> = baseline.iter().map(|s| (s.id, s)).collect();
        self.slots
            .iter()
            .filter(|slot| by_id.get(&slot.id).map_or(true, |saved| **saved != slot.snapshot()))
            .collect()
    }

    /// Every slot keyed `slot0`, `slot1`, ... by index, with unset fields as 0.
    pub fn serialize_all(&self) -> BTreeMap<String, SlotRecord> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                (
                    format!("slot{}", index),
                    SlotRecord {
                        id: slot.id,
                        position: slot.position.unwrap_or(0),
                        contest_count: slot.contest_count,
                        win_count: slot.win_count,
                    },
                )
            })
            .collect()
    }

    /// A placed slot at exactly `position`, else an unplaced one when asking for 0.
    fn index_at_position(&self, position: i32) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.position == Some(position))
            .or_else(|| {
                if position == 0 {
                    self.slots.iter().position(|slot| slot.position.is_none())
                } else {
                    None
                }
            })
    }

    /// Order by position, unplaced slots last.
    fn sort_slots(&mut self) {
        self.slots
            .sort_by_key(|slot| (slot.position.is_none(), slot.position.unwrap_or(0)));
    }
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod slots_tests;
