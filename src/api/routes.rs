//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::header::{self, HeaderName},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::CoachContext;
use crate::error::AppError;
use crate::handlers::{
    ImportMatchCommand, MatchDeleteHandler, MatchImportHandler, SheetExportHandler,
};
use crate::ledger::{AthleteTotals, SeasonLedger};
use crate::store::MatchStore;
use crate::tabular::MetadataFallback;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    /// Present when the upload corrects an existing match
    #[serde(default)]
    pub match_id: Option<Uuid>,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub goals_conceded: Option<i32>,
    #[serde(default)]
    pub match_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub match_id: Uuid,
    pub created: bool,
    pub opponent: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub match_date: NaiveDate,
    pub season: String,
    pub imported_rows: usize,
    pub unresolved: Vec<String>,
    pub totals: Vec<AthleteTotals>,
}

#[derive(Debug, Deserialize)]
pub struct SeasonQuery {
    /// Defaults to the caller's current season
    #[serde(default)]
    pub season: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchSummaryResponse {
    pub match_id: Uuid,
    pub season: String,
    pub opponent: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub match_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchSummaryResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct MatchAthleteResponse {
    pub athlete_id: Uuid,
    pub player_code: String,
    pub name: String,
    pub goals: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub suspensions: i32,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub season: String,
    pub opponent: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub match_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub athletes: Vec<MatchAthleteResponse>,
}

#[derive(Debug, Serialize)]
pub struct TeamTotalsResponse {
    pub season: String,
    pub athletes: Vec<AthleteTotals>,
}

#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub season: String,
    pub athletes_rebuilt: u64,
    pub athletes: Vec<AthleteTotals>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<PgPool> {
    Router::new()
        // Sheet import and the blank template
        .route("/imports", post(import_match))
        .route("/imports/template", get(export_template))
        // Match views and corrections
        .route("/matches", get(list_matches))
        .route("/matches/:match_id", get(get_match))
        .route("/matches/:match_id", delete(delete_match))
        .route("/matches/:match_id/sheet", get(export_match_sheet))
        // Season totals
        .route("/athletes/:athlete_id/totals", get(get_athlete_totals))
        .route("/totals", get(get_team_totals))
        .route("/totals/rebuild", post(rebuild_totals))
}

// =========================================================================
// POST /imports
// =========================================================================

/// Import a match sheet for the caller's team.
///
/// With `match_id` in the query the upload replaces that match's rows;
/// without it a new match is created. Metadata query parameters fill in
/// cells the sheet leaves empty.
async fn import_match(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<ImportResponse>), AppError> {
    let handler = MatchImportHandler::new(pool);

    let command = ImportMatchCommand::new(body.to_vec()).with_fallback(MetadataFallback {
        opponent: query.opponent,
        goals_conceded: query.goals_conceded,
        match_date: query.match_date,
    });
    let command = if let Some(match_id) = query.match_id {
        command.with_match_id(match_id)
    } else {
        command
    };

    let outcome = handler.execute(command, &context).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ImportResponse {
            match_id: outcome.match_id,
            created: outcome.created,
            opponent: outcome.opponent,
            goals_scored: outcome.goals_scored,
            goals_conceded: outcome.goals_conceded,
            match_date: outcome.match_date,
            season: outcome.season,
            imported_rows: outcome.imported_rows,
            unresolved: outcome.unresolved,
            totals: outcome.totals,
        }),
    ))
}

// =========================================================================
// GET /imports/template
// =========================================================================

/// Download a blank sheet pre-filled with the team roster
async fn export_template(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
) -> Result<([(HeaderName, String); 2], Vec<u8>), AppError> {
    let handler = SheetExportHandler::new(pool);
    let bytes = handler.team_template(&context).await?;

    Ok((csv_headers("match_template.csv"), bytes))
}

// =========================================================================
// GET /matches
// =========================================================================

/// List the team's matches in a season, newest first
async fn list_matches(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<MatchListResponse>, AppError> {
    let season = query.season.unwrap_or_else(|| context.season.clone());

    let store = MatchStore::new(pool);
    let records = store.matches_for_team(context.team_id, &season).await?;

    let matches: Vec<MatchSummaryResponse> = records
        .into_iter()
        .map(|m| MatchSummaryResponse {
            match_id: m.id,
            season: m.season,
            opponent: m.opponent,
            goals_scored: m.goals_scored,
            goals_conceded: m.goals_conceded,
            match_date: m.match_date,
        })
        .collect();

    let total = matches.len();
    Ok(Json(MatchListResponse { matches, total }))
}

// =========================================================================
// GET /matches/:match_id
// =========================================================================

/// Get one match with its stat rows
async fn get_match(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Path(match_id): Path<Uuid>,
) -> Result<Json<MatchResponse>, AppError> {
    let store = MatchStore::new(pool);

    let record = store
        .find_match(match_id)
        .await?
        .ok_or(AppError::MatchNotFound(match_id))?;

    if record.team_id != context.team_id {
        return Err(AppError::ForeignMatch(match_id));
    }

    let athletes: Vec<MatchAthleteResponse> = store
        .stats_with_athletes(match_id)
        .await?
        .into_iter()
        .map(|s| MatchAthleteResponse {
            athlete_id: s.athlete_id,
            player_code: s.player_code,
            name: s.name,
            goals: s.stats.goals,
            yellow_cards: s.stats.yellow_cards,
            red_cards: s.stats.red_cards,
            suspensions: s.stats.suspensions,
        })
        .collect();

    Ok(Json(MatchResponse {
        match_id: record.id,
        season: record.season,
        opponent: record.opponent,
        goals_scored: record.goals_scored,
        goals_conceded: record.goals_conceded,
        match_date: record.match_date,
        created_at: record.created_at,
        updated_at: record.updated_at,
        athletes,
    }))
}

// =========================================================================
// DELETE /matches/:match_id
// =========================================================================

/// Delete a match and reverse its ledger contributions
async fn delete_match(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Path(match_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let handler = MatchDeleteHandler::new(pool);
    handler.execute(match_id, &context).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// GET /matches/:match_id/sheet
// =========================================================================

/// Download a match as a re-uploadable correction sheet
async fn export_match_sheet(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Path(match_id): Path<Uuid>,
) -> Result<([(HeaderName, String); 2], Vec<u8>), AppError> {
    let handler = SheetExportHandler::new(pool);
    let bytes = handler.match_sheet(match_id, &context).await?;

    Ok((csv_headers(&format!("match_{}.csv", match_id)), bytes))
}

// =========================================================================
// GET /athletes/:athlete_id/totals
// =========================================================================

/// Get one athlete's season totals
async fn get_athlete_totals(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Path(athlete_id): Path<Uuid>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<AthleteTotals>, AppError> {
    let season = query.season.unwrap_or_else(|| context.season.clone());

    let ledger = SeasonLedger::new(pool);
    let totals = ledger
        .totals_for_athlete(context.team_id, athlete_id, &season)
        .await?
        .ok_or(AppError::AthleteNotFound(athlete_id))?;

    Ok(Json(totals))
}

// =========================================================================
// GET /totals
// =========================================================================

/// Get season totals for the whole roster
async fn get_team_totals(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<TeamTotalsResponse>, AppError> {
    let season = query.season.unwrap_or_else(|| context.season.clone());

    let ledger = SeasonLedger::new(pool);
    let athletes = ledger.totals_for_team(context.team_id, &season).await?;

    Ok(Json(TeamTotalsResponse { season, athletes }))
}

// =========================================================================
// POST /totals/rebuild
// =========================================================================

/// Recompute season totals from the stored per-match stat rows
async fn rebuild_totals(
    State(pool): State<PgPool>,
    Extension(context): Extension<CoachContext>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<RebuildResponse>, AppError> {
    let season = query.season.unwrap_or_else(|| context.season.clone());

    let ledger = SeasonLedger::new(pool.clone());

    let mut tx = pool.begin().await?;
    let athletes_rebuilt = ledger.rebuild(&mut tx, context.team_id, &season).await?;
    tx.commit().await?;

    tracing::info!(
        team_id = %context.team_id,
        season = %season,
        athletes_rebuilt,
        "Season totals rebuilt from stat rows"
    );

    let athletes = ledger.totals_for_team(context.team_id, &season).await?;

    Ok(Json(RebuildResponse {
        season,
        athletes_rebuilt,
        athletes,
    }))
}

fn csv_headers(filename: &str) -> [(HeaderName, String); 2] {
    [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ]
}
