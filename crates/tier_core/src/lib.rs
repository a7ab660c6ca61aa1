//! Tier standings engine for head-to-head rivalries.
//!
//! Each competitor in a rivalry owns a [`RankingLedger`]: an ordered roster
//! of character [`Slot`]s and a single `standing` integer that encodes both
//! their tier (S..F) and prestige cycle. After every [`Contest`] the
//! [`adjust`] step moves both standings by the margin of victory, and
//! [`reverse`] undoes it exactly.
//!
//! The crate performs no I/O. Callers load and persist records themselves
//! and serialize concurrent edits to the same rivalry.

pub mod contest;
pub mod error;
pub mod ledger;
pub mod rivalry;
pub mod sampling;
pub mod slots;
pub mod standings;
pub mod types;

pub use contest::*;
pub use error::{Error, Result};
pub use ledger::*;
pub use rivalry::*;
pub use sampling::*;
pub use slots::*;
pub use standings::*;
pub use types::*;
