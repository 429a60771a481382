//! Roster resolution
//!
//! Maps sheet player codes to athlete records on the importing team's
//! roster. A code that matches nothing is collected rather than fatal:
//! the import proceeds without that row.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Contribution;
use crate::tabular::SheetRow;

/// An athlete row whose player code matched the team roster.
#[derive(Debug, Clone)]
pub struct ResolvedRow {
    pub athlete_id: Uuid,
    pub player_code: String,
    pub stats: Contribution,
}

/// One active roster entry, as listed for sheet exports.
#[derive(Debug, Clone)]
pub struct RosterAthlete {
    pub id: Uuid,
    pub player_code: String,
    pub name: String,
}

/// Outcome of resolving a payload's rows against the roster.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Rows that will be imported, ordered by athlete id. The import's
    /// write phase takes its totals row locks in this one global order.
    pub rows: Vec<ResolvedRow>,

    /// Player codes that matched no active roster athlete, in sheet order
    pub unresolved: Vec<String>,
}

/// Resolves player codes for one team with a single batched lookup.
#[derive(Debug, Clone)]
pub struct RosterResolver {
    pool: PgPool,
}

impl RosterResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve every sheet row against the team's active roster.
    ///
    /// Unmatched codes land in `Resolution::unresolved` and their rows are
    /// dropped. If the same code appears on several rows, the last row
    /// wins; a match holds one stat line per athlete.
    pub async fn resolve_rows(
        &self,
        team_id: Uuid,
        rows: &[SheetRow],
    ) -> Result<Resolution, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Resolution::default());
        }

        let codes: Vec<String> = rows.iter().map(|r| r.player_code.clone()).collect();

        let found: Vec<(String, Uuid)> = sqlx::query_as(
            r#"
            SELECT player_code, id
            FROM athletes
            WHERE team_id = $1 AND player_code = ANY($2) AND is_active
            "#,
        )
        .bind(team_id)
        .bind(&codes)
        .fetch_all(&self.pool)
        .await?;

        let by_code: HashMap<String, Uuid> = found.into_iter().collect();

        Ok(merge_rows(&by_code, rows))
    }

    /// List the team's active roster ordered by player code.
    pub async fn active_roster(&self, team_id: Uuid) -> Result<Vec<RosterAthlete>, sqlx::Error> {
        let rows: Vec<(Uuid, String, String)> = sqlx::query_as(
            r#"
            SELECT id, player_code, name
            FROM athletes
            WHERE team_id = $1 AND is_active
            ORDER BY player_code
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, player_code, name)| RosterAthlete {
                id,
                player_code,
                name,
            })
            .collect())
    }
}

/// Split sheet rows into resolved and unresolved, deduplicating repeated
/// codes so the later row replaces the earlier one in place. Resolved
/// rows come out sorted by athlete id.
fn merge_rows(by_code: &HashMap<String, Uuid>, rows: &[SheetRow]) -> Resolution {
    let mut positions: HashMap<Uuid, usize> = HashMap::new();
    let mut resolution = Resolution::default();

    for row in rows {
        match by_code.get(&row.player_code) {
            Some(&athlete_id) => {
                let resolved = ResolvedRow {
                    athlete_id,
                    player_code: row.player_code.clone(),
                    stats: row.stats,
                };
                match positions.get(&athlete_id) {
                    Some(&at) => resolution.rows[at] = resolved,
                    None => {
                        positions.insert(athlete_id, resolution.rows.len());
                        resolution.rows.push(resolved);
                    }
                }
            }
            None => {
                if !resolution.unresolved.contains(&row.player_code) {
                    resolution.unresolved.push(row.player_code.clone());
                }
            }
        }
    }

    resolution.rows.sort_by_key(|r| r.athlete_id);
    resolution
}
