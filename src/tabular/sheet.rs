//! Match sheet parsing
//!
//! Turns uploaded CSV bytes into a typed `ImportPayload`. The sheet layout
//! is positional: a metadata header row, a metadata value row, a blank
//! separator, an athlete column header, then one row per athlete. Header
//! text is never inspected, only positions count.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

use crate::domain::Contribution;

use super::ParseError;

/// Metadata header row, as written by exports
pub const METADATA_HEADER: [&str; 3] = ["Opponent", "Goals Conceded", "Match Date"];

/// Athlete column header row, as written by exports
pub const ATHLETE_HEADER: [&str; 6] = [
    "Player Code",
    "Name",
    "Goals",
    "Yellow Cards",
    "Red Cards",
    "Suspensions",
];

/// One athlete row as it appears on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    /// External stable player code, the resolver's lookup key
    pub player_code: String,

    /// Display name from the sheet; never used for resolution
    pub name: String,

    pub stats: Contribution,
}

/// Match metadata supplied out-of-band with the request, used for any
/// metadata cell the sheet leaves empty.
#[derive(Debug, Clone, Default)]
pub struct MetadataFallback {
    pub opponent: Option<String>,
    pub goals_conceded: Option<i32>,
    pub match_date: Option<NaiveDate>,
}

/// Parsed upload: match metadata plus athlete rows.
///
/// Metadata stays optional here. The orchestrator fills the gaps, from the
/// stored match on re-import or from defaults on first import.
#[derive(Debug, Clone)]
pub struct ImportPayload {
    pub opponent: Option<String>,
    pub goals_conceded: Option<i32>,
    pub match_date: Option<NaiveDate>,
    pub rows: Vec<SheetRow>,
}

/// Parse an uploaded match sheet in a single pass.
///
/// Stat cells are lenient: empty or unparseable content counts as 0, since
/// coaches hand-edit these files. Dates are accepted as ISO (`2026-03-01`)
/// or dotted (`01.03.2026`). Sheet metadata wins over `fallback`; a field
/// only falls back when its cell is empty.
///
/// # Errors
/// - `ParseError::TooFewLines` if the upload cannot contain the layout
/// - `ParseError::ShortRow` if an athlete row has fewer than 6 fields
/// - `ParseError::MissingMetadata` if, after merging the fallback, no
///   metadata field is present at all
pub fn parse_payload(
    bytes: &[u8],
    fallback: &MetadataFallback,
) -> Result<ImportPayload, ParseError> {
    let lines = count_lines(bytes);
    if lines < 4 {
        return Err(ParseError::TooFewLines(lines));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let mut opponent = None;
    let mut goals_conceded = None;
    let mut match_date = None;
    let mut rows = Vec::new();

    let mut index = 0usize;
    for record in reader.records() {
        let record = record?;

        // The separator may arrive as a quoted empty field instead of a
        // blank line (which the reader already drops). A record that is
        // one empty field is a separator, not data.
        if record.len() == 1 && record.get(0) == Some("") {
            continue;
        }

        match index {
            // Metadata header and athlete column header, skipped by position
            0 | 2 => {}
            1 => {
                opponent = non_empty(record.get(0));
                goals_conceded = parse_metadata_number(record.get(1));
                match_date = record.get(2).and_then(parse_match_date);
            }
            _ => {
                if record.len() < 6 {
                    return Err(ParseError::ShortRow {
                        line: record_line(&record),
                        fields: record.len(),
                    });
                }

                // Rows without a player code are padding, not data.
                let player_code = record.get(0).unwrap_or("").to_string();
                if player_code.is_empty() {
                    continue;
                }

                rows.push(SheetRow {
                    player_code,
                    name: record.get(1).unwrap_or("").to_string(),
                    stats: Contribution::new(
                        stat_cell(&record, 2),
                        stat_cell(&record, 3),
                        stat_cell(&record, 4),
                        stat_cell(&record, 5),
                    ),
                });
            }
        }

        index += 1;
    }

    let opponent = opponent.or_else(|| fallback.opponent.clone());
    let goals_conceded = goals_conceded.or(fallback.goals_conceded).map(|v| v.max(0));
    let match_date = match_date.or(fallback.match_date);

    if opponent.is_none() && goals_conceded.is_none() && match_date.is_none() {
        return Err(ParseError::MissingMetadata);
    }

    Ok(ImportPayload {
        opponent,
        goals_conceded,
        match_date,
        rows,
    })
}

/// Physical line count, ignoring a trailing newline.
fn count_lines(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let mut count = bytes.split(|&b| b == b'\n').count();
    if bytes.ends_with(b"\n") {
        count -= 1;
    }
    count
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Lenient metadata number: empty means absent, unparseable means 0.
fn parse_metadata_number(cell: Option<&str>) -> Option<i32> {
    let raw = cell.unwrap_or("");
    if raw.is_empty() {
        return None;
    }
    Some(raw.parse::<i32>().unwrap_or(0))
}

fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .ok()
}

/// Lenient stat cell: empty or unparseable content counts as 0.
fn stat_cell(record: &StringRecord, idx: usize) -> i32 {
    record
        .get(idx)
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(0)
}

fn record_line(record: &StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}
