//! Sheet Export Handler
//!
//! Produces CSV sheets in the same shape the importer accepts, so a
//! coach can download, edit and re-upload. The template carries the
//! roster with blank metadata; the match sheet carries the stored
//! metadata and every roster athlete's recorded stats.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CoachContext, Contribution};
use crate::error::AppError;
use crate::roster::RosterResolver;
use crate::store::MatchStore;
use crate::tabular::{ATHLETE_HEADER, METADATA_HEADER};

pub struct SheetExportHandler {
    store: MatchStore,
    roster: RosterResolver,
}

impl SheetExportHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: MatchStore::new(pool.clone()),
            roster: RosterResolver::new(pool),
        }
    }

    /// Blank sheet for the team: metadata left empty for the coach to
    /// fill in, one zeroed row per active roster athlete.
    pub async fn team_template(&self, context: &CoachContext) -> Result<Vec<u8>, AppError> {
        let roster = self.roster.active_roster(context.team_id).await?;

        let zero = Contribution::default();
        let lines: Vec<[String; 6]> = roster
            .iter()
            .map(|a| stat_line(&a.player_code, &a.name, &zero))
            .collect();

        write_sheet([String::new(), String::new(), String::new()], &lines)
    }

    /// Sheet for an existing match, re-uploadable as a correction.
    ///
    /// Every active roster athlete appears, with their stored stats for
    /// this match or zeros if they have no stat row.
    pub async fn match_sheet(
        &self,
        match_id: Uuid,
        context: &CoachContext,
    ) -> Result<Vec<u8>, AppError> {
        let record = self
            .store
            .find_match(match_id)
            .await?
            .ok_or(AppError::MatchNotFound(match_id))?;

        if record.team_id != context.team_id {
            return Err(AppError::ForeignMatch(match_id));
        }

        let roster = self.roster.active_roster(context.team_id).await?;
        let stats = self.store.stats_with_athletes(match_id).await?;
        let by_athlete: HashMap<Uuid, Contribution> =
            stats.iter().map(|s| (s.athlete_id, s.stats)).collect();

        let lines: Vec<[String; 6]> = roster
            .iter()
            .map(|a| {
                let stats = by_athlete.get(&a.id).copied().unwrap_or_default();
                stat_line(&a.player_code, &a.name, &stats)
            })
            .collect();

        write_sheet(
            [
                record.opponent.clone(),
                record.goals_conceded.to_string(),
                record.match_date.format("%Y-%m-%d").to_string(),
            ],
            &lines,
        )
    }
}

fn stat_line(player_code: &str, name: &str, stats: &Contribution) -> [String; 6] {
    [
        player_code.to_string(),
        name.to_string(),
        stats.goals.to_string(),
        stats.yellow_cards.to_string(),
        stats.red_cards.to_string(),
        stats.suspensions.to_string(),
    ]
}

fn write_sheet(metadata: [String; 3], athletes: &[[String; 6]]) -> Result<Vec<u8>, AppError> {
    // Flexible: the separator row is narrower than the sections around it.
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());

    writer.write_record(&METADATA_HEADER)?;
    writer.write_record(&metadata)?;
    // Single empty field, the separator shape the parser skips.
    writer.write_record([""])?;
    writer.write_record(&ATHLETE_HEADER)?;
    for line in athletes {
        writer.write_record(line)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish sheet: {}", e)))
}
