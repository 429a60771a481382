//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

// Fixed identities so tests can assert against known rows.
pub const TEAM_A: &str = "00000000-0000-0000-0000-0000000000a1";
pub const COACH_A: &str = "00000000-0000-0000-0000-0000000000c1";
pub const TEAM_B: &str = "00000000-0000-0000-0000-0000000000a2";
pub const COACH_B: &str = "00000000-0000-0000-0000-0000000000c2";

// Team A roster. P9 is deactivated and must never resolve from a sheet.
pub const ATHLETE_P1: &str = "00000000-0000-0000-0000-0000000000b1";
pub const ATHLETE_P2: &str = "00000000-0000-0000-0000-0000000000b2";
pub const ATHLETE_P3: &str = "00000000-0000-0000-0000-0000000000b3";
pub const ATHLETE_P4: &str = "00000000-0000-0000-0000-0000000000b4";
pub const ATHLETE_P9: &str = "00000000-0000-0000-0000-0000000000b9";

// Team B roster, for cross-team isolation tests.
pub const ATHLETE_Q1: &str = "00000000-0000-0000-0000-0000000000d1";

pub const SEASON: &str = "2025/26";

pub fn uuid(value: &str) -> Uuid {
    value.parse().expect("Fixed test UUID must parse")
}

/// Setup test database - truncate tables and seed two teams with rosters
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    // Clean up DB for fresh state
    sqlx::query("TRUNCATE TABLE athlete_season_totals, match_athlete_stats, matches, athletes, coaches, teams CASCADE")
        .execute(&mut *tx)
        .await
        .expect("Failed to clean up DB");

    // 1. Two teams, one coach each
    for (team_id, coach_id, team_name, coach_name) in [
        (TEAM_A, COACH_A, "HC Nordstern", "Coach Larsen"),
        (TEAM_B, COACH_B, "HC Falken", "Coach Meier"),
    ] {
        sqlx::query(
            r#"
            INSERT INTO teams (id, name, current_season)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(uuid(team_id))
        .bind(team_name)
        .bind(SEASON)
        .execute(&mut *tx)
        .await
        .expect("Failed to seed team");

        sqlx::query(
            r#"
            INSERT INTO coaches (id, team_id, name, is_active)
            VALUES ($1, $2, $3, TRUE)
            "#,
        )
        .bind(uuid(coach_id))
        .bind(uuid(team_id))
        .bind(coach_name)
        .execute(&mut *tx)
        .await
        .expect("Failed to seed coach");
    }

    // 2. Team A roster
    for (athlete_id, code, name, active) in [
        (ATHLETE_P1, "P1", "Anna Keller", true),
        (ATHLETE_P2, "P2", "Mia Berg", true),
        (ATHLETE_P3, "P3", "Lena Voss", true),
        (ATHLETE_P4, "P4", "Sara Brandt", true),
        (ATHLETE_P9, "P9", "Edda Holm", false),
    ] {
        sqlx::query(
            r#"
            INSERT INTO athletes (id, team_id, player_code, name, is_active)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(uuid(athlete_id))
        .bind(uuid(TEAM_A))
        .bind(code)
        .bind(name)
        .bind(active)
        .execute(&mut *tx)
        .await
        .expect("Failed to seed athlete");
    }

    // 3. One athlete on team B
    sqlx::query(
        r#"
        INSERT INTO athletes (id, team_id, player_code, name, is_active)
        VALUES ($1, $2, 'Q1', 'Tove Lund', TRUE)
        "#,
    )
    .bind(uuid(ATHLETE_Q1))
    .bind(uuid(TEAM_B))
    .execute(&mut *tx)
    .await
    .expect("Failed to seed athlete");

    tx.commit().await.expect("Failed to commit transaction");

    pool
}

/// Build match sheet bytes in the four-part layout the importer expects.
pub fn sheet_bytes(opponent: &str, goals_conceded: &str, match_date: &str, rows: &[&str]) -> Vec<u8> {
    let mut sheet = String::new();
    sheet.push_str("Opponent,Goals Conceded,Match Date\n");
    sheet.push_str(&format!("{},{},{}\n", opponent, goals_conceded, match_date));
    sheet.push('\n');
    sheet.push_str("Player Code,Name,Goals,Yellow Cards,Red Cards,Suspensions\n");
    for row in rows {
        sheet.push_str(row);
        sheet.push('\n');
    }
    sheet.into_bytes()
}
