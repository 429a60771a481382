//! Match Store Repository
//!
//! Persistence for match records and the per-athlete per-match stat rows
//! that back exact ledger reversal. Writes run inside the caller's
//! transaction; `lock_match` takes the row lock that serializes concurrent
//! imports of the same match.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::Contribution;

/// A stored match record.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub id: Uuid,
    pub team_id: Uuid,
    /// Season the match was imported under; re-imports stay in this season
    /// even after the team's season rolls over
    pub season: String,
    pub opponent: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub match_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for inserting a brand-new match.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub id: Uuid,
    pub team_id: Uuid,
    pub season: String,
    pub opponent: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub match_date: NaiveDate,
}

/// One athlete's stored contribution to one match. These exact values are
/// what a later reversal feeds back to the ledger.
#[derive(Debug, Clone)]
pub struct StatRow {
    pub athlete_id: Uuid,
    pub stats: Contribution,
}

/// Stat row joined with roster identity, for match views.
#[derive(Debug, Clone)]
pub struct StatRowDetail {
    pub athlete_id: Uuid,
    pub player_code: String,
    pub name: String,
    pub stats: Contribution,
}

/// Match Store for persisting and reading matches
#[derive(Debug, Clone)]
pub struct MatchStore {
    pool: PgPool,
}

impl MatchStore {
    /// Create a new MatchStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Match rows
    // =========================================================================

    /// Load a match and lock its row for the rest of the transaction.
    ///
    /// Two imports targeting the same match serialize here; the second one
    /// blocks until the first commits and then sees its writes.
    pub async fn lock_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        let row: Option<MatchTuple> = sqlx::query_as(
            r#"
            SELECT id, team_id, season, opponent, goals_scored, goals_conceded,
                   match_date, created_at, updated_at
            FROM matches
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(match_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(map_match))
    }

    /// Read a match without locking.
    pub async fn find_match(&self, match_id: Uuid) -> Result<Option<MatchRecord>, sqlx::Error> {
        let row: Option<MatchTuple> = sqlx::query_as(
            r#"
            SELECT id, team_id, season, opponent, goals_scored, goals_conceded,
                   match_date, created_at, updated_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_match))
    }

    /// All matches of a team in one season, newest first.
    pub async fn matches_for_team(
        &self,
        team_id: Uuid,
        season: &str,
    ) -> Result<Vec<MatchRecord>, sqlx::Error> {
        let rows: Vec<MatchTuple> = sqlx::query_as(
            r#"
            SELECT id, team_id, season, opponent, goals_scored, goals_conceded,
                   match_date, created_at, updated_at
            FROM matches
            WHERE team_id = $1 AND season = $2
            ORDER BY match_date DESC, created_at DESC
            "#,
        )
        .bind(team_id)
        .bind(season)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_match).collect())
    }

    /// Insert a brand-new match.
    pub async fn insert_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        new_match: &NewMatch,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO matches (
                id, team_id, season, opponent, goals_scored, goals_conceded, match_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(new_match.id)
        .bind(new_match.team_id)
        .bind(&new_match.season)
        .bind(&new_match.opponent)
        .bind(new_match.goals_scored)
        .bind(new_match.goals_conceded)
        .bind(new_match.match_date)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Overwrite a match's metadata and scoreline on re-import.
    pub async fn update_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        opponent: &str,
        goals_scored: i32,
        goals_conceded: i32,
        match_date: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE matches
            SET opponent = $2, goals_scored = $3, goals_conceded = $4,
                match_date = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .bind(opponent)
        .bind(goals_scored)
        .bind(goals_conceded)
        .bind(match_date)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Delete a match. Its stat rows go with it via cascade.
    pub async fn delete_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Stat rows
    // =========================================================================

    /// The stored stat rows of a match, exactly as applied to the ledger.
    /// Ordered by athlete id, the same order imports lock totals rows in.
    pub async fn stats_for_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<Vec<StatRow>, sqlx::Error> {
        let rows: Vec<(Uuid, i32, i32, i32, i32)> = sqlx::query_as(
            r#"
            SELECT athlete_id, goals, yellow_cards, red_cards, suspensions
            FROM match_athlete_stats
            WHERE match_id = $1
            ORDER BY athlete_id
            "#,
        )
        .bind(match_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(athlete_id, goals, yellow, red, suspensions)| StatRow {
                athlete_id,
                stats: Contribution::new(goals, yellow, red, suspensions),
            })
            .collect())
    }

    /// Insert one athlete's contribution to a match.
    pub async fn insert_stat(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        athlete_id: Uuid,
        stats: &Contribution,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO match_athlete_stats (
                match_id, athlete_id, goals, yellow_cards, red_cards, suspensions
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(match_id)
        .bind(athlete_id)
        .bind(stats.goals)
        .bind(stats.yellow_cards)
        .bind(stats.red_cards)
        .bind(stats.suspensions)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Drop all of a match's stat rows. Re-import replaces rows wholesale
    /// rather than patching them, so reversal stays exact.
    pub async fn delete_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM match_athlete_stats WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    /// Stat rows of a match joined with roster identity, roster order.
    pub async fn stats_with_athletes(
        &self,
        match_id: Uuid,
    ) -> Result<Vec<StatRowDetail>, sqlx::Error> {
        let rows: Vec<(Uuid, String, String, i32, i32, i32, i32)> = sqlx::query_as(
            r#"
            SELECT s.athlete_id, a.player_code, a.name,
                   s.goals, s.yellow_cards, s.red_cards, s.suspensions
            FROM match_athlete_stats s
            JOIN athletes a ON a.id = s.athlete_id
            WHERE s.match_id = $1
            ORDER BY a.player_code
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(athlete_id, player_code, name, goals, yellow, red, suspensions)| StatRowDetail {
                    athlete_id,
                    player_code,
                    name,
                    stats: Contribution::new(goals, yellow, red, suspensions),
                },
            )
            .collect())
    }
}

type MatchTuple = (
    Uuid,
    Uuid,
    String,
    String,
    i32,
    i32,
    NaiveDate,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn map_match(row: MatchTuple) -> MatchRecord {
    let (
        id,
        team_id,
        season,
        opponent,
        goals_scored,
        goals_conceded,
        match_date,
        created_at,
        updated_at,
    ) = row;

    MatchRecord {
        id,
        team_id,
        season,
        opponent,
        goals_scored,
        goals_conceded,
        match_date,
        created_at,
        updated_at,
    }
}
