//! Coach Context
//!
//! Identity and scope of the coach behind the current request, resolved by
//! middleware from the trusted X-Coach-Id header.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for an operation. Every import, export and read is scoped to the
/// coach's team; the season is the team's current season at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachContext {
    /// Coach ID from the X-Coach-Id header
    pub coach_id: Uuid,

    /// Team the coach is assigned to
    pub team_id: Uuid,

    /// The team's current season label, e.g. "2025/26"
    pub season: String,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl CoachContext {
    pub fn new(coach_id: Uuid, team_id: Uuid, season: impl Into<String>) -> Self {
        Self {
            coach_id,
            team_id,
            season: season.into(),
            correlation_id: None,
        }
    }

    /// Attach a correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}
