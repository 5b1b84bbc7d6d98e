//! # Batch Builder
//!
//! One logical update becomes a list of single-cell writes that go to the
//! store in a single batch call. Ranges use A1 notation (`Página1!F7`).
use std::fmt;

use crate::{
    codec::{column_index_to_letter, row_number},
    locate::column_position,
    models::{STATUS, STATUS_COMPLETED},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    Sheet(String),
    Cell {
        sheet: String,
        column: String,
        row: usize,
    },
}

impl RangeSpec {
    pub fn sheet(name: &str) -> Self {
        Self::Sheet(name.to_string())
    }

    pub fn cell(sheet: &str, column_index: usize, data_index: usize) -> Self {
        Self::Cell {
            sheet: sheet.to_string(),
            column: column_index_to_letter(column_index),
            row: row_number(data_index),
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sheet(sheet) => write!(f, "{}", quote_sheet(sheet)),
            Self::Cell { sheet, column, row } => write!(f, "{}!{column}{row}", quote_sheet(sheet)),
        }
    }
}

/// Sheet names with anything besides letters, digits or `_` need quotes in
/// A1 notation, with inner quotes doubled.
fn quote_sheet(sheet: &str) -> String {
    if !sheet.is_empty() && sheet.chars().all(|c| c.is_alphanumeric() || c == '_') {
        sheet.to_string()
    } else {
        format!("'{}'", sheet.replace('\'', "''"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub range: RangeSpec,
    pub value: String,
}

/// Writes for one row, one per resolved column.
pub fn build_row_writes<I, V>(sheet: &str, data_index: usize, cells: I) -> Vec<CellWrite>
where
    I: IntoIterator<Item = (usize, V)>,
    V: Into<String>,
{
    cells
        .into_iter()
        .map(|(column, value)| CellWrite {
            range: RangeSpec::cell(sheet, column, data_index),
            value: value.into(),
        })
        .collect()
}

/// Company self-service: every submitted field naming a known header is
/// written, unknown ones are dropped, and the status is set to completed.
pub fn build_dynamic_writes<'a, I>(
    sheet: &str,
    headers: &[String],
    data_index: usize,
    fields: I,
) -> Vec<CellWrite>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let resolved = fields
        .into_iter()
        .filter_map(|(name, value)| column_position(headers, name).map(|column| (column, value)));

    let mut writes = build_row_writes(sheet, data_index, resolved);

    if let Some(status) = column_position(headers, STATUS) {
        writes.push(CellWrite {
            range: RangeSpec::cell(sheet, status, data_index),
            value: STATUS_COMPLETED.to_string(),
        });
    }

    writes
}
