//! Tabular Parser Errors

use thiserror::Error;

/// Errors raised while turning uploaded bytes into an `ImportPayload`.
///
/// All of these mean the upload is structurally unusable and nothing was
/// persisted.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The upload is too short to contain the fixed sheet layout
    #[error("Upload must contain at least 4 lines (found {0})")]
    TooFewLines(usize),

    /// An athlete data row is missing stat columns
    #[error("Athlete row at line {line} has {fields} fields, expected at least 6")]
    ShortRow { line: usize, fields: usize },

    /// Neither the sheet nor the request supplied any match metadata
    #[error("Opponent, goals conceded and match date are all missing from sheet and request")]
    MissingMetadata,

    /// The CSV layer rejected the input (encoding, unbalanced quotes)
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}
