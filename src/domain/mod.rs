//! Domain module
//!
//! Core domain types and business logic.

pub mod context;
pub mod contribution;
pub mod error;
pub mod totals;

pub use context::CoachContext;
pub use contribution::{
    Contribution, StatField, MAX_RED_CARDS, MAX_SUSPENSIONS, MAX_YELLOW_CARDS,
};
pub use error::DomainError;
pub use totals::SeasonTotals;
