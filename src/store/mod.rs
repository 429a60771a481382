//! Match store module
//!
//! Durable storage for match records and per-match stat rows.

pub mod repository;

pub use repository::{MatchRecord, MatchStore, NewMatch, StatRow, StatRowDetail};
