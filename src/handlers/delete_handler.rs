//! Match Delete Handler
//!
//! Removing a match is the inverse of importing it: every stored stat
//! row is reversed out of the season ledger before the match record is
//! deleted, all in one transaction.

use sqlx::PgPool;

use crate::domain::CoachContext;
use crate::error::AppError;
use crate::ledger::SeasonLedger;
use crate::store::MatchStore;

use super::DeleteMatchOutcome;

pub struct MatchDeleteHandler {
    store: MatchStore,
    ledger: SeasonLedger,
    pool: PgPool,
}

impl MatchDeleteHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: MatchStore::new(pool.clone()),
            ledger: SeasonLedger::new(pool.clone()),
            pool,
        }
    }

    pub async fn execute(
        &self,
        match_id: uuid::Uuid,
        context: &CoachContext,
    ) -> Result<DeleteMatchOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = self
            .store
            .lock_match(&mut tx, match_id)
            .await?
            .ok_or(AppError::MatchNotFound(match_id))?;

        if existing.team_id != context.team_id {
            return Err(AppError::ForeignMatch(match_id));
        }

        let rows = self.store.stats_for_match(&mut tx, match_id).await?;
        for row in &rows {
            self.ledger
                .reverse(&mut tx, row.athlete_id, &existing.season, &row.stats)
                .await?;
        }

        self.store.delete_match(&mut tx, match_id).await?;

        tx.commit().await?;

        tracing::info!(
            match_id = %match_id,
            coach_id = %context.coach_id,
            reversed = rows.len(),
            "Match deleted and ledger reversed"
        );

        Ok(DeleteMatchOutcome {
            match_id,
            reversed_rows: rows.len(),
        })
    }
}
