//! Session tunables, loaded from TOML

use serde::{Deserialize, Serialize};
use std::path::Path;

use tier_core::{
    TierLayout, DEFAULT_BENCH_ROUNDS, DEFAULT_BENCH_STEP, PROVISIONAL_THRESHOLD, TOTAL_SLOTS,
};

use crate::error::Result;

/// Slot steps per stock of margin after a contest
pub const STEPS_PER_STOCK: i32 = 3;

/// Stock-scaled offset used when placing a character for the first time
pub const POSITION_BIAS: i32 = 14;

/// Assumed opponent position when neither participant has been placed
pub const UNKNOWN_MIDPOINT: i32 = 42;

/// Configuration for a rivalry session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Roster size of the game
    pub total_slots: usize,
    /// How far a participating slot moves per stock
    pub steps_per_stock: i32,
    /// Offset per stock for first placements
    pub position_bias: i32,
    /// Fallback opponent position for first placements
    pub unknown_midpoint: i32,
    /// Resolved contests a slot sits out after playing
    pub bench_rounds: usize,
    /// Bench reduction when nothing is eligible
    pub bench_step: usize,
    /// Contests before a slot stops being provisional
    pub provisional_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_slots: TOTAL_SLOTS,
            steps_per_stock: STEPS_PER_STOCK,
            position_bias: POSITION_BIAS,
            unknown_midpoint: UNKNOWN_MIDPOINT,
            bench_rounds: DEFAULT_BENCH_ROUNDS,
            bench_step: DEFAULT_BENCH_STEP,
            provisional_threshold: PROVISIONAL_THRESHOLD,
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn layout(&self) -> TierLayout {
        TierLayout::new(self.total_slots)
    }
}
