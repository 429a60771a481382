//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::contribution::StatField;

/// Business rule violations found while validating sheet rows.
///
/// These errors are independent of the web/infrastructure layer. Any one of
/// them rejects the whole import; partial application is never allowed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A disciplinary cap was broken on a single sheet row
    #[error("{field} value {value} for player {player_code} exceeds the per-match limit of {limit}")]
    LimitExceeded {
        player_code: String,
        field: StatField,
        limit: i32,
        value: i32,
    },

    /// A stat column held a negative number
    #[error("{field} for player {player_code} is negative ({value})")]
    NegativeStat {
        player_code: String,
        field: StatField,
        value: i32,
    },
}

impl DomainError {
    /// Create a limit exceeded error
    pub fn limit_exceeded(
        player_code: impl Into<String>,
        field: StatField,
        limit: i32,
        value: i32,
    ) -> Self {
        Self::LimitExceeded {
            player_code: player_code.into(),
            field,
            limit,
            value,
        }
    }

    /// Create a negative stat error
    pub fn negative_stat(player_code: impl Into<String>, field: StatField, value: i32) -> Self {
        Self::NegativeStat {
            player_code: player_code.into(),
            field,
            value,
        }
    }

    /// The sheet row the error points at
    pub fn player_code(&self) -> &str {
        match self {
            Self::LimitExceeded { player_code, .. } => player_code,
            Self::NegativeStat { player_code, .. } => player_code,
        }
    }
}
