//! Identifiers, tiers and roster layout shared by every part of the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use uuid::Uuid;

/// Number of skill tiers a standing cycles through.
pub const TIER_COUNT: usize = 7;

/// Roster size of the live game (12 slots in each of S..E, 14 in F).
pub const TOTAL_SLOTS: usize = 86;

/// Contests a slot must play before it stops being provisional.
pub const PROVISIONAL_THRESHOLD: u32 = 10;

/// Largest stock difference a contest result may carry.
pub const MAX_STOCKS: u8 = 3;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Identifies a rivalry between two users.
    RivalryId
);
id_type!(
    /// Identifies one competitor's ledger inside a rivalry.
    LedgerId
);
id_type!(
    /// Identifies a single slot inside a ledger.
    SlotId
);
id_type!(
    /// Identifies a contest.
    ContestId
);
id_type!(UserId);
id_type!(
    /// Identifies a playable character of the game.
    CharacterId
);

/// The seven skill tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Tier {
    pub const ALL: [Tier; TIER_COUNT] = [
        Tier::S,
        Tier::A,
        Tier::B,
        Tier::C,
        Tier::D,
        Tier::E,
        Tier::F,
    ];

    /// Tier for an index, wrapping every seven like a standing does.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % TIER_COUNT]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
            Tier::F => "F",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Splits a roster into seven contiguous position bands.
///
/// Every tier gets `floor(total_slots / 7)` positions except the worst one,
/// which also absorbs the remainder. The boundaries are computed once and
/// stored, so callers never re-derive them with integer division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LayoutRepr", into = "LayoutRepr")]
pub struct TierLayout {
    total_slots: usize,
    /// `TIER_COUNT + 1` ascending boundaries; band `t` is `bounds[t]..bounds[t + 1]`.
    bounds: [i32; TIER_COUNT + 1],
}

#[derive(Serialize, Deserialize)]
struct LayoutRepr {
    total_slots: usize,
}

impl From<LayoutRepr> for TierLayout {
    fn from(repr: LayoutRepr) -> Self {
        TierLayout::new(repr.total_slots)
    }
}

impl From<TierLayout> for LayoutRepr {
    fn from(layout: TierLayout) -> Self {
        LayoutRepr {
            total_slots: layout.total_slots,
        }
    }
}

impl TierLayout {
    pub fn new(total_slots: usize) -> Self {
        let per_tier = (total_slots / TIER_COUNT) as i32;
        let mut bounds = [0i32; TIER_COUNT + 1];
        for (tier, bound) in bounds.iter_mut().enumerate().take(TIER_COUNT) {
            *bound = tier as i32 * per_tier;
        }
        bounds[TIER_COUNT] = total_slots as i32;
        Self {
            total_slots,
            bounds,
        }
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    /// Base band width, `floor(total_slots / 7)`.
    pub fn slots_per_tier(&self) -> usize {
        self.total_slots / TIER_COUNT
    }

    /// Highest valid position.
    pub fn max_position(&self) -> i32 {
        self.total_slots as i32 - 1
    }

    /// Half-open range of positions belonging to `tier`.
    pub fn band(&self, tier: usize) -> Range<i32> {
        let tier = tier % TIER_COUNT;
        self.bounds[tier]..self.bounds[tier + 1]
    }

    /// Tier index holding `position`, `None` for unset or out-of-range positions.
    pub fn tier_for_position(&self, position: Option<i32>) -> Option<usize> {
        let position = position?;
        if position < 0 || position > self.max_position() {
            return None;
        }
        (0..TIER_COUNT).find(|&tier| self.band(tier).contains(&position))
    }

    /// Tier label for a position, or `"U"` when the slot is unknown or out of range.
    pub fn tier_label_for_position(&self, position: Option<i32>) -> &'static str {
        self.tier_for_position(position)
            .map(|tier| Tier::from_index(tier).label())
            .unwrap_or("U")
    }

    /// Clamp a requested position into the roster.
    pub fn clamp(&self, position: i32) -> i32 {
        position.clamp(0, self.max_position().max(0))
    }
}

impl Default for TierLayout {
    fn default() -> Self {
        Self::new(TOTAL_SLOTS)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
