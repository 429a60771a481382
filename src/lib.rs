//! matchday_api Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod domain;
pub mod handlers;
pub mod ledger;
pub mod roster;
pub mod store;
pub mod tabular;

// Private modules (used only by main.rs binary)
pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{CoachContext, Contribution, DomainError, SeasonTotals, StatField};
pub use tabular::{ImportPayload, MetadataFallback, ParseError, SheetRow};
