//! Rivalry sessions on top of the tier standings engine
//!
//! This crate provides:
//! - Contest sessions: picking fighters, applying results, undoing them
//! - TOML configuration of the session tunables
//! - JSON persistence of a whole rivalry
//! - Text reports of standings and tier rosters
//!
//! # Usage
//!
//! ```bash
//! # Start a rivalry and play a contest
//! cargo run -p rivalry -- new ana ben
//! cargo run -p rivalry -- next
//! cargo run -p rivalry -- resolve -2 --nudge 1
//! ```

mod config;
mod error;
mod report;
mod session;
mod store;

pub use config::*;
pub use error::{Error, Result};
pub use session::*;
