//! Error types for tier_core.

use thiserror::Error;

use crate::types::SlotId;

/// Result type for tier_core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by slot and contest operations.
///
/// Standings movement never fails; blocked moves are reported through
/// boolean returns instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No slot currently occupies the requested position.
    #[error("no slot at position {position}")]
    SlotNotFound { position: i32 },

    /// The slot id is not part of this ledger.
    #[error("unknown slot {0}")]
    UnknownSlot(SlotId),

    /// A contest result must lie within -3..=3.
    #[error("contest result {0} is out of range")]
    ResultOutOfRange(i32),

    /// The contest already carries a result.
    #[error("contest already resolved")]
    AlreadyResolved,
}
