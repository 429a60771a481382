//! Season ledger module
//!
//! Incremental maintenance of per-athlete season totals. Totals are only
//! ever changed through apply/reverse pairs or an explicit rebuild.

pub mod service;

pub use service::{AthleteTotals, SeasonLedger};
