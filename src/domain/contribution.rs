//! Contribution type
//!
//! Domain primitive for the stat line one athlete posts in one match.
//! Disciplinary limits are checked before a contribution is allowed to
//! touch storage, so out-of-range values cannot enter the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DomainError;

/// Maximum yellow cards one athlete can collect in a single match
pub const MAX_YELLOW_CARDS: i32 = 2;

/// Maximum red cards one athlete can collect in a single match
pub const MAX_RED_CARDS: i32 = 1;

/// Maximum two-minute suspensions one athlete can collect in a single match
pub const MAX_SUSPENSIONS: i32 = 3;

/// Stat fields tracked per athlete per match.
///
/// Used in validation errors so the caller can tell which column of a
/// sheet row was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Goals,
    YellowCards,
    RedCards,
    Suspensions,
}

impl StatField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatField::Goals => "goals",
            StatField::YellowCards => "yellow_cards",
            StatField::RedCards => "red_cards",
            StatField::Suspensions => "suspensions",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contribution is one athlete's stat line for one match.
///
/// # Invariants (after `validate`)
/// - No field is negative
/// - `yellow_cards` <= 2, `red_cards` <= 1, `suspensions` <= 3
///
/// # Example
/// ```
/// use matchday_api::domain::Contribution;
///
/// let stats = Contribution::new(3, 1, 0, 0);
/// assert!(stats.validate("P7").is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contribution {
    pub goals: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub suspensions: i32,
}

impl Contribution {
    pub fn new(goals: i32, yellow_cards: i32, red_cards: i32, suspensions: i32) -> Self {
        Self {
            goals,
            yellow_cards,
            red_cards,
            suspensions,
        }
    }

    /// Validate the disciplinary rules for this stat line.
    ///
    /// `player_code` is only used to label the error so the caller can
    /// point at the offending sheet row.
    ///
    /// # Errors
    /// - `DomainError::NegativeStat` if any field is below zero
    /// - `DomainError::LimitExceeded` if a card or suspension cap is broken
    pub fn validate(&self, player_code: &str) -> Result<(), DomainError> {
        let fields = [
            (StatField::Goals, self.goals),
            (StatField::YellowCards, self.yellow_cards),
            (StatField::RedCards, self.red_cards),
            (StatField::Suspensions, self.suspensions),
        ];

        for (field, value) in fields {
            if value < 0 {
                return Err(DomainError::negative_stat(player_code, field, value));
            }
        }

        if self.yellow_cards > MAX_YELLOW_CARDS {
            return Err(DomainError::limit_exceeded(
                player_code,
                StatField::YellowCards,
                MAX_YELLOW_CARDS,
                self.yellow_cards,
            ));
        }

        if self.red_cards > MAX_RED_CARDS {
            return Err(DomainError::limit_exceeded(
                player_code,
                StatField::RedCards,
                MAX_RED_CARDS,
                self.red_cards,
            ));
        }

        if self.suspensions > MAX_SUSPENSIONS {
            return Err(DomainError::limit_exceeded(
                player_code,
                StatField::Suspensions,
                MAX_SUSPENSIONS,
                self.suspensions,
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}G/{}Y/{}R/{}S",
            self.goals, self.yellow_cards, self.red_cards, self.suspensions
        )
    }
}
