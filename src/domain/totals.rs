//! Season totals
//!
//! The cumulative ledger entry for one athlete in one season. The database
//! maintains these values with atomic increments; this type carries the same
//! arithmetic for read models and for reasoning about apply/reverse pairs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contribution::Contribution;

/// Cumulative season statistics for one athlete.
///
/// `apply` and `reverse` are exact inverses as long as `reverse` is fed the
/// same contribution that was applied, which is why per-match stat rows are
/// stored verbatim. Floors at zero protect the ledger if history was
/// manipulated out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub total_goals: i32,
    pub total_yellow: i32,
    pub total_red: i32,
    pub total_suspensions: i32,
    pub games_played: i32,
    /// Goals per played game, rounded to two decimal places. Zero when no
    /// games are on record.
    pub avg_goals: Decimal,
}

impl SeasonTotals {
    pub fn zero() -> Self {
        Self {
            total_goals: 0,
            total_yellow: 0,
            total_red: 0,
            total_suspensions: 0,
            games_played: 0,
            avg_goals: Decimal::ZERO,
        }
    }

    /// Add one game's contribution to the running totals.
    pub fn apply(&mut self, stats: &Contribution) {
        self.total_goals += stats.goals;
        self.total_yellow += stats.yellow_cards;
        self.total_red += stats.red_cards;
        self.total_suspensions += stats.suspensions;
        self.games_played += 1;
        self.recompute_average();
    }

    /// Remove one game's contribution from the running totals.
    ///
    /// Every counter is floored at zero.
    pub fn reverse(&mut self, stats: &Contribution) {
        self.total_goals = (self.total_goals - stats.goals).max(0);
        self.total_yellow = (self.total_yellow - stats.yellow_cards).max(0);
        self.total_red = (self.total_red - stats.red_cards).max(0);
        self.total_suspensions = (self.total_suspensions - stats.suspensions).max(0);
        self.games_played = (self.games_played - 1).max(0);
        self.recompute_average();
    }

    fn recompute_average(&mut self) {
        self.avg_goals = if self.games_played > 0 {
            (Decimal::from(self.total_goals) / Decimal::from(self.games_played)).round_dp(2)
        } else {
            Decimal::ZERO
        };
    }
}

impl Default for SeasonTotals {
    fn default() -> Self {
        Self::zero()
    }
}
