//! Command definitions
//!
//! Commands represent intentions to change the system state.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::AthleteTotals;
use crate::tabular::MetadataFallback;

// =========================================================================
// ImportMatchCommand
// =========================================================================

/// Command to import one match sheet for the caller's team.
///
/// A present `match_id` turns the import into a correction of that match;
/// otherwise a new match is created.
#[derive(Debug, Clone)]
pub struct ImportMatchCommand {
    pub match_id: Option<Uuid>,

    /// Raw sheet bytes as uploaded
    pub csv_bytes: Vec<u8>,

    /// Metadata supplied next to the upload, for cells the sheet leaves empty
    pub fallback: MetadataFallback,
}

impl ImportMatchCommand {
    pub fn new(csv_bytes: Vec<u8>) -> Self {
        Self {
            match_id: None,
            csv_bytes,
            fallback: MetadataFallback::default(),
        }
    }

    pub fn with_match_id(mut self, match_id: Uuid) -> Self {
        self.match_id = Some(match_id);
        self
    }

    pub fn with_fallback(mut self, fallback: MetadataFallback) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Result of a committed import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub match_id: Uuid,

    /// True when the import created the match, false when it replaced one
    pub created: bool,

    pub opponent: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub match_date: NaiveDate,
    pub season: String,

    /// Stat rows written for this match
    pub imported_rows: usize,

    /// Player codes dropped because they matched no roster athlete
    pub unresolved: Vec<String>,

    /// Post-import season totals of every athlete the sheet touched
    pub totals: Vec<AthleteTotals>,
}

/// Result of deleting a match.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteMatchOutcome {
    pub match_id: Uuid,

    /// Stat rows whose contributions were reversed out of the ledger
    pub reversed_rows: usize,
}
