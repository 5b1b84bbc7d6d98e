//! # Row Codec
//!
//! Grid of cells in, keyed records out.
//!
//! - Row 0 of the grid is the header row
//! - Data index `i` lives on spreadsheet row `i + 2` (1-based, header on row 1)
//! - [`row_number`] is the only place that offset is applied
use std::sync::Arc;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::RecordsError;

/// Rows occupied by headers above the first data row.
pub const HEADER_ROWS: usize = 1;

const LETTERS: usize = 26;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(HEADER_ROWS..).unwrap_or(&[])
    }

    pub fn cell(&self, data_index: usize, column: usize) -> Option<&str> {
        self.data_rows()
            .get(data_index)
            .and_then(|row| row.get(column))
            .map(String::as_str)
    }
}

impl<S: Into<String>> From<Vec<Vec<S>>> for Grid {
    fn from(rows: Vec<Vec<S>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// One data row keyed by the header row.
///
/// Cells past the end of a short row are absent rather than empty, and are
/// left out when the record is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    headers: Arc<[String]>,
    cells: Vec<String>,
    index: usize,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&str> {
        let position = self.headers.iter().position(|header| header == field)?;

        self.cells.get(position).map(String::as_str)
    }

    /// Zero-based position among the data rows.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn row_number(&self) -> usize {
        row_number(self.index)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.headers.len().min(self.cells.len());
        let mut map = serializer.serialize_map(Some(len))?;

        for (header, cell) in self.headers.iter().zip(self.cells.iter()) {
            map.serialize_entry(header, cell)?;
        }

        map.end()
    }
}

pub fn decode_records(grid: &Grid) -> Vec<Record> {
    let headers: Arc<[String]> = grid.headers().into();

    grid.data_rows()
        .iter()
        .enumerate()
        .map(|(index, row)| Record {
            headers: headers.clone(),
            cells: row.iter().take(headers.len()).cloned().collect(),
            index,
        })
        .collect()
}

/// Inverse of [`decode_records`]. Absent fields become empty cells and
/// trailing empty cells are dropped, the way the spreadsheet API returns them.
pub fn encode_records(headers: &[String], records: &[Record]) -> Grid {
    let mut rows = Vec::with_capacity(records.len() + HEADER_ROWS);
    rows.push(headers.to_vec());

    for record in records {
        let mut row: Vec<String> = headers
            .iter()
            .map(|header| record.get(header).unwrap_or_default().to_string())
            .collect();

        while row.last().is_some_and(String::is_empty) {
            row.pop();
        }

        rows.push(row);
    }

    Grid::new(rows)
}

/// 1-based spreadsheet row of a data index.
pub fn row_number(data_index: usize) -> usize {
    data_index + HEADER_ROWS + 1
}

/// Bijective base 26: A..Z, AA..AZ, BA.., ZZ, AAA..
pub fn column_index_to_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;

    while remaining > 0 {
        let digit = (remaining - 1) % LETTERS;
        letters.push(b'A' + digit as u8);
        remaining = (remaining - 1) / LETTERS;
    }

    letters.iter().rev().map(|&b| b as char).collect()
}

pub fn column_letter_checked(index: i64) -> Result<String, RecordsError> {
    let index = usize::try_from(index)
        .map_err(|_| RecordsError::InvalidArgument(format!("negative column index {index}")))?;

    Ok(column_index_to_letter(index))
}

pub fn column_letter_to_index(letters: &str) -> Result<usize, RecordsError> {
    if letters.is_empty() {
        return Err(RecordsError::InvalidArgument("empty column letter".to_string()));
    }

    let mut result = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(RecordsError::InvalidArgument(format!(
                "invalid column letter {letters}"
            )));
        }

        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        result = result
            .checked_mul(LETTERS)
            .and_then(|shifted| shifted.checked_add(digit))
            .ok_or_else(|| RecordsError::InvalidArgument(format!("column {letters} too wide")))?;
    }

    Ok(result - 1)
}
