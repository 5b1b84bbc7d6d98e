//! # Records
//!
//! Treats one spreadsheet tab as a flat table of internship records.
//!
//!
//!
//! ## Layout
//!
//! - Row 1 of the sheet holds the headers, every row below is one record
//! - Headers are used verbatim as record keys, so renaming a column in the
//!   sheet renames the JSON key
//! - Short rows are normal, the spreadsheet API drops trailing empty cells
//!
//!
//!
//! ## Pieces
//!
//! - [`codec`]: grid to records, column letters, row numbers
//! - [`filter`]: request filters, stats and select options
//! - [`grades`]: locale number parsing and the grade average
//! - [`locate`]: column resolution and identifier lookup
//! - [`batch`]: single-cell writes for one logical update
//!
//!
//!
//! ## Notes
//!
//! Nothing here talks to the network. The server reads the whole grid, hands it
//! to these functions and writes back whatever [`batch`] produced in one call.
//! There is no revision check between the read and the write, so two advisors
//! editing the same record race cell by cell and the last write wins.
use thiserror::Error;

pub mod batch;
pub mod codec;
pub mod filter;
pub mod grades;
pub mod locate;
pub mod models;
pub mod utils;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordsError {
    #[error("Column not found in sheet: {0}")]
    MissingColumn(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
