//! Command Handlers module
//!
//! Handlers that orchestrate the sheet import, match delete and sheet
//! export operations. Each handler coordinates the parser, roster,
//! match store and season ledger behind a single entry point.

mod commands;
mod import_handler;
mod delete_handler;
mod export_handler;


pub use commands::*;
pub use import_handler::MatchImportHandler;
pub use delete_handler::MatchDeleteHandler;
pub use export_handler::SheetExportHandler;
