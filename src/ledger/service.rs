//! Season Ledger Service
//!
//! Applies and reverses per-match contributions against the
//! `athlete_season_totals` table. All increments happen inside SQL, never
//! as read-modify-write in the application, so concurrent imports of
//! different matches cannot lose updates to the same athlete.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{Contribution, SeasonTotals};

/// One athlete's season totals joined with roster identity.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AthleteTotals {
    pub athlete_id: Uuid,
    pub player_code: String,
    pub name: String,
    pub season: String,
    #[serde(flatten)]
    pub totals: SeasonTotals,
}

/// Season Ledger for cumulative athlete statistics
#[derive(Debug, Clone)]
pub struct SeasonLedger {
    pool: PgPool,
}

impl SeasonLedger {
    /// Create a new SeasonLedger
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // apply
    // =========================================================================

    /// Add one game's contribution to an athlete's season totals.
    ///
    /// Creates the totals row lazily on first contribution. The average is
    /// recomputed from the post-increment values in the same statement.
    pub async fn apply(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        athlete_id: Uuid,
        season: &str,
        stats: &Contribution,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO athlete_season_totals (
                athlete_id, season, total_goals, total_yellow, total_red,
                total_suspensions, games_played, avg_goals
            )
            VALUES ($1, $2, $3, $4, $5, $6, 1, ROUND($3::numeric, 2))
            ON CONFLICT (athlete_id, season) DO UPDATE
            SET
                total_goals       = athlete_season_totals.total_goals + EXCLUDED.total_goals,
                total_yellow      = athlete_season_totals.total_yellow + EXCLUDED.total_yellow,
                total_red         = athlete_season_totals.total_red + EXCLUDED.total_red,
                total_suspensions = athlete_season_totals.total_suspensions + EXCLUDED.total_suspensions,
                games_played      = athlete_season_totals.games_played + 1,
                avg_goals         = ROUND(
                    (athlete_season_totals.total_goals + EXCLUDED.total_goals)::numeric
                    / (athlete_season_totals.games_played + 1),
                    2
                ),
                updated_at        = NOW()
            "#,
        )
        .bind(athlete_id)
        .bind(season)
        .bind(stats.goals)
        .bind(stats.yellow_cards)
        .bind(stats.red_cards)
        .bind(stats.suspensions)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    // =========================================================================
    // reverse
    // =========================================================================

    /// Remove one game's contribution from an athlete's season totals.
    ///
    /// Must be fed the exact values that were applied for that game, which
    /// the match store keeps per (match, athlete). Counters are floored at
    /// zero; the average drops to zero with the last played game.
    pub async fn reverse(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        athlete_id: Uuid,
        season: &str,
        stats: &Contribution,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE athlete_season_totals
            SET
                total_goals       = GREATEST(total_goals - $3, 0),
                total_yellow      = GREATEST(total_yellow - $4, 0),
                total_red         = GREATEST(total_red - $5, 0),
                total_suspensions = GREATEST(total_suspensions - $6, 0),
                games_played      = GREATEST(games_played - 1, 0),
                avg_goals         = CASE
                    WHEN games_played <= 1 THEN 0
                    ELSE ROUND(GREATEST(total_goals - $3, 0)::numeric / (games_played - 1), 2)
                END,
                updated_at        = NOW()
            WHERE athlete_id = $1 AND season = $2
            "#,
        )
        .bind(athlete_id)
        .bind(season)
        .bind(stats.goals)
        .bind(stats.yellow_cards)
        .bind(stats.red_cards)
        .bind(stats.suspensions)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    // =========================================================================
    // rebuild
    // =========================================================================

    /// Explicit reset: recompute a team's season totals from the stored
    /// per-match stat rows. Returns the number of athlete rows rebuilt.
    ///
    /// This is the recovery path if totals are suspected to have drifted;
    /// normal operation never overwrites totals wholesale.
    pub async fn rebuild(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        team_id: Uuid,
        season: &str,
    ) -> Result<u64, sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM athlete_season_totals AS t
            USING athletes AS a
            WHERE a.id = t.athlete_id AND a.team_id = $1 AND t.season = $2
            "#,
        )
        .bind(team_id)
        .bind(season)
        .execute(&mut **tx)
        .await?;

        let rebuilt = sqlx::query(
            r#"
            INSERT INTO athlete_season_totals (
                athlete_id, season, total_goals, total_yellow, total_red,
                total_suspensions, games_played, avg_goals
            )
            SELECT
                s.athlete_id,
                $2,
                SUM(s.goals)::int,
                SUM(s.yellow_cards)::int,
                SUM(s.red_cards)::int,
                SUM(s.suspensions)::int,
                COUNT(*)::int,
                ROUND(SUM(s.goals)::numeric / COUNT(*), 2)
            FROM match_athlete_stats s
            JOIN matches m ON m.id = s.match_id
            WHERE m.team_id = $1 AND m.season = $2
            GROUP BY s.athlete_id
            "#,
        )
        .bind(team_id)
        .bind(season)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        Ok(rebuilt)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Season totals for one athlete on the given team.
    ///
    /// Athletes without a totals row yet read as all zeroes. Returns `None`
    /// when the athlete does not exist on that team.
    pub async fn totals_for_athlete(
        &self,
        team_id: Uuid,
        athlete_id: Uuid,
        season: &str,
    ) -> Result<Option<AthleteTotals>, sqlx::Error> {
        let row: Option<TotalsTuple> = sqlx::query_as(
            r#"
            SELECT a.id, a.player_code, a.name,
                   COALESCE(t.total_goals, 0),
                   COALESCE(t.total_yellow, 0),
                   COALESCE(t.total_red, 0),
                   COALESCE(t.total_suspensions, 0),
                   COALESCE(t.games_played, 0),
                   COALESCE(t.avg_goals, 0)
            FROM athletes a
            LEFT JOIN athlete_season_totals t
                ON t.athlete_id = a.id AND t.season = $3
            WHERE a.team_id = $1 AND a.id = $2
            "#,
        )
        .bind(team_id)
        .bind(athlete_id)
        .bind(season)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_totals(r, season)))
    }

    /// Season totals for every active athlete on the team, roster order.
    pub async fn totals_for_team(
        &self,
        team_id: Uuid,
        season: &str,
    ) -> Result<Vec<AthleteTotals>, sqlx::Error> {
        let rows: Vec<TotalsTuple> = sqlx::query_as(
            r#"
            SELECT a.id, a.player_code, a.name,
                   COALESCE(t.total_goals, 0),
                   COALESCE(t.total_yellow, 0),
                   COALESCE(t.total_red, 0),
                   COALESCE(t.total_suspensions, 0),
                   COALESCE(t.games_played, 0),
                   COALESCE(t.avg_goals, 0)
            FROM athletes a
            LEFT JOIN athlete_season_totals t
                ON t.athlete_id = a.id AND t.season = $2
            WHERE a.team_id = $1 AND a.is_active
            ORDER BY a.player_code
            "#,
        )
        .bind(team_id)
        .bind(season)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| map_totals(r, season)).collect())
    }

    /// Season totals for a specific set of athletes, roster order. Used to
    /// report the post-import state of exactly the athletes a sheet touched.
    pub async fn totals_for_athletes(
        &self,
        season: &str,
        athlete_ids: &[Uuid],
    ) -> Result<Vec<AthleteTotals>, sqlx::Error> {
        if athlete_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<TotalsTuple> = sqlx::query_as(
            r#"
            SELECT a.id, a.player_code, a.name,
                   COALESCE(t.total_goals, 0),
                   COALESCE(t.total_yellow, 0),
                   COALESCE(t.total_red, 0),
                   COALESCE(t.total_suspensions, 0),
                   COALESCE(t.games_played, 0),
                   COALESCE(t.avg_goals, 0)
            FROM athletes a
            LEFT JOIN athlete_season_totals t
                ON t.athlete_id = a.id AND t.season = $1
            WHERE a.id = ANY($2)
            ORDER BY a.player_code
            "#,
        )
        .bind(season)
        .bind(athlete_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| map_totals(r, season)).collect())
    }
}

type TotalsTuple = (Uuid, String, String, i32, i32, i32, i32, i32, Decimal);

fn map_totals(row: TotalsTuple, season: &str) -> AthleteTotals {
    let (
        athlete_id,
        player_code,
        name,
        total_goals,
        total_yellow,
        total_red,
        total_suspensions,
        games_played,
        avg_goals,
    ) = row;

    AthleteTotals {
        athlete_id,
        player_code,
        name,
        season: season.to_string(),
        totals: SeasonTotals {
            total_goals,
            total_yellow,
            total_red,
            total_suspensions,
            games_played,
            avg_goals,
        },
    }
}
