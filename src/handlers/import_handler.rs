//! Match Import Handler
//!
//! The reconciliation flow for sheet uploads. Parsing, validation and
//! roster resolution all happen before the first write; the write phase
//! (reverse old rows on a correction, persist the match, apply new rows)
//! runs inside a single transaction, so the ledger either absorbs the
//! whole sheet or none of it.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::CoachContext;
use crate::error::AppError;
use crate::ledger::SeasonLedger;
use crate::roster::{ResolvedRow, RosterResolver};
use crate::store::{MatchStore, NewMatch};
use crate::tabular;

use super::{ImportMatchCommand, ImportOutcome};

/// Handler for match sheet imports
pub struct MatchImportHandler {
    store: MatchStore,
    ledger: SeasonLedger,
    roster: RosterResolver,
    pool: PgPool,
}

impl MatchImportHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: MatchStore::new(pool.clone()),
            ledger: SeasonLedger::new(pool.clone()),
            roster: RosterResolver::new(pool.clone()),
            pool,
        }
    }

    /// Execute the import command.
    pub async fn execute(
        &self,
        command: ImportMatchCommand,
        context: &CoachContext,
    ) -> Result<ImportOutcome, AppError> {
        let payload = tabular::parse_payload(&command.csv_bytes, &command.fallback)?;

        // Any invalid row rejects the whole sheet before storage is touched.
        for row in &payload.rows {
            row.stats.validate(&row.player_code)?;
        }

        let resolution = self
            .roster
            .resolve_rows(context.team_id, &payload.rows)
            .await?;

        if !resolution.unresolved.is_empty() {
            tracing::warn!(
                team_id = %context.team_id,
                codes = ?resolution.unresolved,
                "Dropping sheet rows with unknown player codes"
            );
        }

        // The match scoreline is derived from the resolved rows, never
        // taken from the metadata block.
        let goals_scored = derived_scoreline(&resolution.rows);

        let mut tx = self.pool.begin().await?;

        let (match_id, created, opponent, goals_conceded, match_date, season) = match command
            .match_id
        {
            // Correction of an existing match: take the row lock, reverse
            // the stored contributions, then replace the stat rows.
            Some(match_id) => {
                let existing = self
                    .store
                    .lock_match(&mut tx, match_id)
                    .await?
                    .ok_or(AppError::MatchNotFound(match_id))?;

                if existing.team_id != context.team_id {
                    return Err(AppError::ForeignMatch(match_id));
                }

                let old_rows = self.store.stats_for_match(&mut tx, match_id).await?;
                for row in &old_rows {
                    self.ledger
                        .reverse(&mut tx, row.athlete_id, &existing.season, &row.stats)
                        .await?;
                }
                self.store.delete_stats(&mut tx, match_id).await?;

                // Metadata cells the upload left empty keep their stored values.
                let opponent = payload
                    .opponent
                    .clone()
                    .unwrap_or_else(|| existing.opponent.clone());
                let goals_conceded = payload.goals_conceded.unwrap_or(existing.goals_conceded);
                let match_date = payload.match_date.unwrap_or(existing.match_date);

                self.store
                    .update_match(
                        &mut tx,
                        match_id,
                        &opponent,
                        goals_scored,
                        goals_conceded,
                        match_date,
                    )
                    .await?;

                // The correction stays in the season the match was first
                // imported under, even if the team's season has rolled over.
                (
                    match_id,
                    false,
                    opponent,
                    goals_conceded,
                    match_date,
                    existing.season,
                )
            }

            // Brand-new match in the team's current season.
            None => {
                let match_id = Uuid::new_v4();
                let opponent = payload.opponent.clone().unwrap_or_default();
                let goals_conceded = payload.goals_conceded.unwrap_or(0);
                let match_date = payload
                    .match_date
                    .unwrap_or_else(|| Utc::now().date_naive());

                self.store
                    .insert_match(
                        &mut tx,
                        &NewMatch {
                            id: match_id,
                            team_id: context.team_id,
                            season: context.season.clone(),
                            opponent: opponent.clone(),
                            goals_scored,
                            goals_conceded,
                            match_date,
                        },
                    )
                    .await?;

                (
                    match_id,
                    true,
                    opponent,
                    goals_conceded,
                    match_date,
                    context.season.clone(),
                )
            }
        };

        for row in &resolution.rows {
            self.store
                .insert_stat(&mut tx, match_id, row.athlete_id, &row.stats)
                .await?;
            self.ledger
                .apply(&mut tx, row.athlete_id, &season, &row.stats)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            match_id = %match_id,
            coach_id = %context.coach_id,
            created,
            rows = resolution.rows.len(),
            skipped = resolution.unresolved.len(),
            correlation_id = ?context.correlation_id,
            "Match import committed"
        );

        let athlete_ids: Vec<Uuid> = resolution.rows.iter().map(|r| r.athlete_id).collect();
        let totals = self.ledger.totals_for_athletes(&season, &athlete_ids).await?;

        Ok(ImportOutcome {
            match_id,
            created,
            opponent,
            goals_scored,
            goals_conceded,
            match_date,
            season,
            imported_rows: resolution.rows.len(),
            unresolved: resolution.unresolved,
            totals,
        })
    }
}

/// Match scoreline summed from the resolved rows, saturating at `i32::MAX`.
pub(super) fn derived_scoreline(rows: &[ResolvedRow]) -> i32 {
    rows.iter()
        .fold(0i32, |sum, row| sum.saturating_add(row.stats.goals))
}
