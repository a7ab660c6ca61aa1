//! Error types for the rivalry runner.

use thiserror::Error;

/// Result type for rivalry operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse session JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Engine(#[from] tier_core::Error),

    /// There is no contest waiting for a result.
    #[error("no contest in progress")]
    NoCurrentContest,

    /// A contest is already waiting for a result.
    #[error("contest {0} is still in progress")]
    ContestInProgress(tier_core::ContestId),

    #[error("nothing to undo")]
    NothingToUndo,

    /// The rivalry has not begun, or a ledger failed to load.
    #[error("rivalry is missing a ledger")]
    MissingLedger,

    #[error("no slot available for side {0}")]
    NoEligibleSlot(tier_core::Side),

    /// The result was recorded but the contest could not be applied.
    #[error("contest {0} could not be applied to the standings")]
    NotApplied(tier_core::ContestId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
