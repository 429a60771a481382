//! Integration tests for the import reconciliation flow
//!
//! These drive the handlers directly against a real database and check the
//! season ledger after every mutation. Run with a DATABASE_URL pointing at a
//! migrated test database.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use matchday_api::domain::CoachContext;
use matchday_api::handlers::{
    ImportMatchCommand, MatchDeleteHandler, MatchImportHandler, SheetExportHandler,
};
use matchday_api::ledger::{AthleteTotals, SeasonLedger};
use matchday_api::store::MatchStore;
use matchday_api::tabular::MetadataFallback;
use matchday_api::AppError;

mod common;

use common::{
    setup_test_db, sheet_bytes, uuid, ATHLETE_P1, ATHLETE_P2, ATHLETE_P3, ATHLETE_Q1, COACH_A,
    COACH_B, SEASON, TEAM_A, TEAM_B,
};

fn context_a() -> CoachContext {
    CoachContext::new(uuid(COACH_A), uuid(TEAM_A), SEASON).with_correlation_id(Uuid::new_v4())
}

fn context_b() -> CoachContext {
    CoachContext::new(uuid(COACH_B), uuid(TEAM_B), SEASON).with_correlation_id(Uuid::new_v4())
}

async fn totals_for(pool: &sqlx::PgPool, athlete: &str, season: &str) -> AthleteTotals {
    SeasonLedger::new(pool.clone())
        .totals_for_athlete(uuid(TEAM_A), uuid(athlete), season)
        .await
        .unwrap()
        .expect("Athlete should exist")
}

async fn table_count(pool: &sqlx::PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

// =========================================================================
// Creating matches
// =========================================================================

#[tokio::test]
async fn test_import_creates_match_and_totals() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let sheet = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,5,1,0,0"]);
    let outcome = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.opponent, "Sharks");
    assert_eq!(outcome.goals_scored, 5);
    assert_eq!(outcome.goals_conceded, 20);
    assert_eq!(outcome.season, SEASON);
    assert_eq!(outcome.imported_rows, 1);
    assert!(outcome.unresolved.is_empty());

    // The match row carries the sheet metadata and the derived scoreline
    let record = MatchStore::new(pool.clone())
        .find_match(outcome.match_id)
        .await
        .unwrap()
        .expect("Match should exist");
    assert_eq!(record.team_id, uuid(TEAM_A));
    assert_eq!(record.goals_scored, 5);
    assert_eq!(record.match_date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

    let totals = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(totals.totals.total_goals, 5);
    assert_eq!(totals.totals.total_yellow, 1);
    assert_eq!(totals.totals.games_played, 1);
    assert_eq!(totals.totals.avg_goals, dec!(5.00));
}

#[tokio::test]
async fn test_scoreline_sums_all_rows() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool);

    let sheet = sheet_bytes(
        "Sharks",
        "18",
        "2026-03-01",
        &["P1,Anna Keller,4,0,0,0", "P2,Mia Berg,3,0,0,0", "P3,Lena Voss,0,0,0,0"],
    );
    let outcome = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    assert_eq!(outcome.goals_scored, 7);
    assert_eq!(outcome.imported_rows, 3);
}

#[tokio::test]
async fn test_zero_stat_row_still_counts_a_game() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let sheet = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,0,0,0,0"]);
    handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    // Playing without scoring is still an appearance
    let totals = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(totals.totals.total_goals, 0);
    assert_eq!(totals.totals.games_played, 1);
    assert_eq!(totals.totals.avg_goals, dec!(0.00));
}

#[tokio::test]
async fn test_duplicate_code_last_row_wins() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let sheet = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &["P1,Anna Keller,2,0,0,0", "P1,Anna Keller,5,1,0,0"],
    );
    let outcome = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    assert_eq!(outcome.imported_rows, 1);
    assert_eq!(outcome.goals_scored, 5);
    assert_eq!(table_count(&pool, "match_athlete_stats").await, 1);

    let totals = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(totals.totals.total_goals, 5);
    assert_eq!(totals.totals.games_played, 1);
}

#[tokio::test]
async fn test_metadata_fallback_fills_empty_cells() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    // Sheet metadata row is entirely empty; the caller supplies the values
    let sheet = sheet_bytes("", "", "", &["P1,Anna Keller,2,0,0,0"]);
    let fallback = MetadataFallback {
        opponent: Some("Falcons".to_string()),
        goals_conceded: Some(12),
        match_date: Some(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()),
    };

    let outcome = handler
        .execute(ImportMatchCommand::new(sheet).with_fallback(fallback), &context_a())
        .await
        .unwrap();

    assert_eq!(outcome.opponent, "Falcons");
    assert_eq!(outcome.goals_conceded, 12);
    assert_eq!(outcome.match_date, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
}

// =========================================================================
// Validation rejects the whole sheet
// =========================================================================

#[tokio::test]
async fn test_limit_violation_rejects_whole_sheet() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    // P1 is fine, P2 has three yellow cards
    let sheet = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &["P1,Anna Keller,5,0,0,0", "P2,Mia Berg,0,3,0,0"],
    );
    let result = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await;

    assert!(matches!(result, Err(AppError::Domain(_))));

    // Nothing was written, not even the valid row
    assert_eq!(table_count(&pool, "matches").await, 0);
    assert_eq!(table_count(&pool, "match_athlete_stats").await, 0);
    assert_eq!(table_count(&pool, "athlete_season_totals").await, 0);
}

#[tokio::test]
async fn test_negative_stat_rejects_whole_sheet() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let sheet = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,-1,0,0,0"]);
    let result = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await;

    assert!(matches!(result, Err(AppError::Domain(_))));
    assert_eq!(table_count(&pool, "matches").await, 0);
}

#[tokio::test]
async fn test_malformed_sheet_is_a_parse_error() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool);

    let result = handler
        .execute(
            ImportMatchCommand::new(b"Opponent,Goals Conceded\nSharks,20".to_vec()),
            &context_a(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Malformed(_))));
}

// =========================================================================
// Roster resolution
// =========================================================================

#[tokio::test]
async fn test_unknown_and_inactive_codes_are_dropped() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    // XX matches nobody, P9 is deactivated
    let sheet = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &["P1,Anna Keller,3,0,0,0", "XX,Ghost Player,2,0,0,0", "P9,Edda Holm,1,0,0,0"],
    );
    let outcome = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    assert_eq!(outcome.imported_rows, 1);
    assert_eq!(outcome.unresolved, vec!["XX".to_string(), "P9".to_string()]);
    assert_eq!(outcome.goals_scored, 3);
    assert_eq!(table_count(&pool, "match_athlete_stats").await, 1);
}

#[tokio::test]
async fn test_codes_resolve_within_the_coaches_team_only() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    // Q1 belongs to team B, so for coach A it is an unknown code
    let sheet = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &["P1,Anna Keller,3,0,0,0", "Q1,Tove Lund,2,0,0,0"],
    );
    let outcome = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    assert_eq!(outcome.unresolved, vec!["Q1".to_string()]);

    let q1_has_totals: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM athlete_season_totals WHERE athlete_id = $1")
            .bind(uuid(ATHLETE_Q1))
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(q1_has_totals, 0);
}

// =========================================================================
// Corrections reverse before they apply
// =========================================================================

#[tokio::test]
async fn test_reimport_replaces_instead_of_accumulating() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let first = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,5,0,0,0"]);
    let created = handler
        .execute(ImportMatchCommand::new(first), &context_a())
        .await
        .unwrap();

    // Corrected sheet for the same match: 8 goals, not 5 more
    let second = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,8,0,0,0"]);
    let corrected = handler
        .execute(
            ImportMatchCommand::new(second).with_match_id(created.match_id),
            &context_a(),
        )
        .await
        .unwrap();

    assert!(!corrected.created);
    assert_eq!(corrected.match_id, created.match_id);
    assert_eq!(corrected.goals_scored, 8);

    let totals = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(totals.totals.total_goals, 8);
    assert_eq!(totals.totals.games_played, 1);
    assert_eq!(totals.totals.avg_goals, dec!(8.00));

    // Still a single match and a single stat row
    assert_eq!(table_count(&pool, "matches").await, 1);
    assert_eq!(table_count(&pool, "match_athlete_stats").await, 1);
}

#[tokio::test]
async fn test_reimport_same_sheet_is_a_no_op() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let sheet = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &["P1,Anna Keller,5,1,0,0", "P2,Mia Berg,2,0,0,1"],
    );
    let created = handler
        .execute(ImportMatchCommand::new(sheet.clone()), &context_a())
        .await
        .unwrap();
    let before = totals_for(&pool, ATHLETE_P1, SEASON).await;

    handler
        .execute(
            ImportMatchCommand::new(sheet).with_match_id(created.match_id),
            &context_a(),
        )
        .await
        .unwrap();

    let after = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(after.totals, before.totals);
}

#[tokio::test]
async fn test_reversal_leaves_other_matches_intact() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let first = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &["P1,Anna Keller,5,0,0,0", "P2,Mia Berg,2,1,0,0"],
    );
    let match_one = handler
        .execute(ImportMatchCommand::new(first), &context_a())
        .await
        .unwrap();

    let second = sheet_bytes("Eagles", "15", "2026-03-08", &["P1,Anna Keller,3,0,0,0"]);
    handler
        .execute(ImportMatchCommand::new(second), &context_a())
        .await
        .unwrap();

    // Correct match one: P1 down to 1 goal, P2 no longer on the sheet
    let corrected = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,1,0,0,0"]);
    handler
        .execute(
            ImportMatchCommand::new(corrected).with_match_id(match_one.match_id),
            &context_a(),
        )
        .await
        .unwrap();

    let p1 = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(p1.totals.total_goals, 4);
    assert_eq!(p1.totals.games_played, 2);
    assert_eq!(p1.totals.avg_goals, dec!(2.00));

    // P2 was removed from the corrected sheet, so the appearance is gone
    let p2 = totals_for(&pool, ATHLETE_P2, SEASON).await;
    assert_eq!(p2.totals.total_goals, 0);
    assert_eq!(p2.totals.total_yellow, 0);
    assert_eq!(p2.totals.games_played, 0);
}

#[tokio::test]
async fn test_accumulation_across_two_matches() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    for (opponent, date) in [("Sharks", "2026-03-01"), ("Eagles", "2026-03-08")] {
        let sheet = sheet_bytes(opponent, "10", date, &["P1,Anna Keller,3,0,0,0"]);
        handler
            .execute(ImportMatchCommand::new(sheet), &context_a())
            .await
            .unwrap();
    }

    let totals = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(totals.totals.total_goals, 6);
    assert_eq!(totals.totals.games_played, 2);
    assert_eq!(totals.totals.avg_goals, dec!(3.00));
}

#[tokio::test]
async fn test_reimport_keeps_stored_metadata_for_empty_cells() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let first = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,5,0,0,0"]);
    let created = handler
        .execute(ImportMatchCommand::new(first), &context_a())
        .await
        .unwrap();

    // Opponent cell left empty on the correction, date moved by a day
    let correction = sheet_bytes("", "22", "2026-03-02", &["P1,Anna Keller,5,0,0,0"]);
    let outcome = handler
        .execute(
            ImportMatchCommand::new(correction).with_match_id(created.match_id),
            &context_a(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.opponent, "Sharks");
    assert_eq!(outcome.goals_conceded, 22);
    assert_eq!(outcome.match_date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
}

#[tokio::test]
async fn test_match_stays_in_its_original_season() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let first = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,4,0,0,0"]);
    let created = handler
        .execute(ImportMatchCommand::new(first), &context_a())
        .await
        .unwrap();

    // The club rolls over to a new season, then corrects the old match
    let next_season_context =
        CoachContext::new(uuid(COACH_A), uuid(TEAM_A), "2026/27").with_correlation_id(Uuid::new_v4());
    let correction = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,6,0,0,0"]);
    let outcome = handler
        .execute(
            ImportMatchCommand::new(correction).with_match_id(created.match_id),
            &next_season_context,
        )
        .await
        .unwrap();

    assert_eq!(outcome.season, SEASON);

    // The correction lands in the old season's ledger, not the new one
    let old = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(old.totals.total_goals, 6);
    let new = totals_for(&pool, ATHLETE_P1, "2026/27").await;
    assert_eq!(new.totals.total_goals, 0);
    assert_eq!(new.totals.games_played, 0);
}

#[tokio::test]
async fn test_reimport_rejects_foreign_match() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool.clone());

    let sheet = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,5,0,0,0"]);
    let created = handler
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    // Coach B cannot correct team A's match
    let foreign = sheet_bytes("Sharks", "20", "2026-03-01", &["Q1,Tove Lund,1,0,0,0"]);
    let result = handler
        .execute(
            ImportMatchCommand::new(foreign).with_match_id(created.match_id),
            &context_b(),
        )
        .await;

    assert!(matches!(result, Err(AppError::ForeignMatch(_))));

    // Team A's totals were not touched
    let totals = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(totals.totals.total_goals, 5);
}

#[tokio::test]
async fn test_reimport_unknown_match_id() {
    let pool = setup_test_db().await;
    let handler = MatchImportHandler::new(pool);

    let sheet = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,5,0,0,0"]);
    let result = handler
        .execute(
            ImportMatchCommand::new(sheet).with_match_id(Uuid::new_v4()),
            &context_a(),
        )
        .await;

    assert!(matches!(result, Err(AppError::MatchNotFound(_))));
}

// =========================================================================
// Deleting matches
// =========================================================================

#[tokio::test]
async fn test_delete_reverses_ledger_and_removes_rows() {
    let pool = setup_test_db().await;
    let import = MatchImportHandler::new(pool.clone());
    let delete = MatchDeleteHandler::new(pool.clone());

    let first = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &["P1,Anna Keller,5,0,0,0", "P2,Mia Berg,2,1,0,0"],
    );
    let match_one = import
        .execute(ImportMatchCommand::new(first), &context_a())
        .await
        .unwrap();

    let second = sheet_bytes("Eagles", "15", "2026-03-08", &["P1,Anna Keller,3,0,0,0"]);
    import
        .execute(ImportMatchCommand::new(second), &context_a())
        .await
        .unwrap();

    let outcome = delete.execute(match_one.match_id, &context_a()).await.unwrap();
    assert_eq!(outcome.reversed_rows, 2);

    // Only the second match remains, in rows and in the ledger
    assert_eq!(table_count(&pool, "matches").await, 1);
    assert_eq!(table_count(&pool, "match_athlete_stats").await, 1);

    let p1 = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(p1.totals.total_goals, 3);
    assert_eq!(p1.totals.games_played, 1);

    let p2 = totals_for(&pool, ATHLETE_P2, SEASON).await;
    assert_eq!(p2.totals.games_played, 0);
}

#[tokio::test]
async fn test_delete_rejects_foreign_match() {
    let pool = setup_test_db().await;
    let import = MatchImportHandler::new(pool.clone());
    let delete = MatchDeleteHandler::new(pool.clone());

    let sheet = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,5,0,0,0"]);
    let created = import
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    let result = delete.execute(created.match_id, &context_b()).await;
    assert!(matches!(result, Err(AppError::ForeignMatch(_))));
    assert_eq!(table_count(&pool, "matches").await, 1);
}

// =========================================================================
// Rebuild
// =========================================================================

#[tokio::test]
async fn test_rebuild_restores_drifted_totals() {
    let pool = setup_test_db().await;
    let import = MatchImportHandler::new(pool.clone());
    let ledger = SeasonLedger::new(pool.clone());

    for (opponent, date) in [("Sharks", "2026-03-01"), ("Eagles", "2026-03-08")] {
        let sheet = sheet_bytes(
            opponent,
            "10",
            date,
            &["P1,Anna Keller,3,1,0,0", "P2,Mia Berg,1,0,0,0"],
        );
        import
            .execute(ImportMatchCommand::new(sheet), &context_a())
            .await
            .unwrap();
    }

    // Simulate drift
    sqlx::query("UPDATE athlete_season_totals SET total_goals = 99, avg_goals = 99 WHERE athlete_id = $1")
        .bind(uuid(ATHLETE_P1))
        .execute(&pool)
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let rebuilt = ledger.rebuild(&mut tx, uuid(TEAM_A), SEASON).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(rebuilt, 2);

    let p1 = totals_for(&pool, ATHLETE_P1, SEASON).await;
    assert_eq!(p1.totals.total_goals, 6);
    assert_eq!(p1.totals.total_yellow, 2);
    assert_eq!(p1.totals.games_played, 2);
    assert_eq!(p1.totals.avg_goals, dec!(3.00));
}

#[tokio::test]
async fn test_rebuild_leaves_other_teams_alone() {
    let pool = setup_test_db().await;
    let import = MatchImportHandler::new(pool.clone());
    let ledger = SeasonLedger::new(pool.clone());

    let sheet_a = sheet_bytes("Sharks", "20", "2026-03-01", &["P1,Anna Keller,5,0,0,0"]);
    import
        .execute(ImportMatchCommand::new(sheet_a), &context_a())
        .await
        .unwrap();

    let sheet_b = sheet_bytes("Wolves", "14", "2026-03-01", &["Q1,Tove Lund,2,0,0,0"]);
    import
        .execute(ImportMatchCommand::new(sheet_b), &context_b())
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    ledger.rebuild(&mut tx, uuid(TEAM_A), SEASON).await.unwrap();
    tx.commit().await.unwrap();

    let q1 = SeasonLedger::new(pool.clone())
        .totals_for_athlete(uuid(TEAM_B), uuid(ATHLETE_Q1), SEASON)
        .await
        .unwrap()
        .expect("Athlete should exist");
    assert_eq!(q1.totals.total_goals, 2);
    assert_eq!(q1.totals.games_played, 1);
}

// =========================================================================
// Sheet export
// =========================================================================

#[tokio::test]
async fn test_match_sheet_covers_the_full_active_roster() {
    let pool = setup_test_db().await;
    let import = MatchImportHandler::new(pool.clone());
    let export = SheetExportHandler::new(pool.clone());

    let sheet = sheet_bytes("Sharks", "20", "2026-03-01", &["P2,Mia Berg,4,1,0,0"]);
    let created = import
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();

    let bytes = export.match_sheet(created.match_id, &context_a()).await.unwrap();
    let text = String::from_utf8(bytes).unwrap();

    // Every active athlete appears, participants with their stats and the
    // rest zeroed. P9 is deactivated and stays off the sheet.
    assert!(text.contains("Sharks,20,2026-03-01"));
    assert!(text.contains("P1,Anna Keller,0,0,0,0"));
    assert!(text.contains("P2,Mia Berg,4,1,0,0"));
    assert!(text.contains("P3,Lena Voss,0,0,0,0"));
    assert!(text.contains("P4,Sara Brandt,0,0,0,0"));
    assert!(!text.contains("P9"));
}

#[tokio::test]
async fn test_exported_sheet_reimports_without_changing_stats() {
    let pool = setup_test_db().await;
    let import = MatchImportHandler::new(pool.clone());
    let export = SheetExportHandler::new(pool.clone());

    // Every active athlete on the sheet, so the export round-trips exactly
    let sheet = sheet_bytes(
        "Sharks",
        "20",
        "2026-03-01",
        &[
            "P1,Anna Keller,5,1,0,0",
            "P2,Mia Berg,2,0,0,0",
            "P3,Lena Voss,0,0,1,0",
            "P4,Sara Brandt,1,0,0,1",
        ],
    );
    let created = import
        .execute(ImportMatchCommand::new(sheet), &context_a())
        .await
        .unwrap();
    let before = totals_for(&pool, ATHLETE_P3, SEASON).await;

    let exported = export.match_sheet(created.match_id, &context_a()).await.unwrap();
    let outcome = import
        .execute(
            ImportMatchCommand::new(exported).with_match_id(created.match_id),
            &context_a(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.imported_rows, 4);
    let after = totals_for(&pool, ATHLETE_P3, SEASON).await;
    assert_eq!(after.totals, before.totals);
}
