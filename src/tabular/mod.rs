//! Tabular module
//!
//! CSV parsing for match sheet uploads. The reverse direction (building
//! sheets from stored data) lives in the export handler and shares the
//! header constants defined here.

pub mod error;
pub mod sheet;

pub use error::ParseError;
pub use sheet::{
    parse_payload, ImportPayload, MetadataFallback, SheetRow, ATHLETE_HEADER, METADATA_HEADER,
};
