//! # Spreadsheet Store
//!
//! The spreadsheet is the database. Everything the server needs from it fits
//! in two calls:
//!
//! - read a whole tab as a grid of strings
//! - write a batch of single cells
//!
//! [`GoogleSheets`] talks to the Sheets REST API with a service account.
//! [`MemoryStore`] keeps grids in memory for tests and local runs.
//!
//!
//!
//! ## Notes
//!
//! The batch is whatever the remote API makes of one `batchUpdate` call. No
//! retries, no locking, no revision check. A failed call is returned as is and
//! nothing is written by us after it.
use records::{
    RecordsError,
    batch::{CellWrite, RangeSpec},
    codec::Grid,
};
use thiserror::Error;

pub mod auth;
pub mod google;
pub mod memory;

pub use google::GoogleSheets;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Spreadsheet API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid range {0}")]
    Range(String),

    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error(transparent)]
    Records(#[from] RecordsError),

    #[error("Store unavailable")]
    Unavailable,
}

pub trait SheetStore: Send + Sync + 'static {
    fn read_grid(&self, range: &RangeSpec) -> impl Future<Output = Result<Grid, StoreError>> + Send;

    fn batch_write(
        &self,
        writes: &[CellWrite],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
