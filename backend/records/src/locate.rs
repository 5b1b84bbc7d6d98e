use std::collections::HashMap;

use crate::{
    RecordsError,
    codec::{Grid, column_index_to_letter},
    utils::normalize_name,
};

/// Header name to zero-based column, for the columns an update needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    positions: HashMap<String, usize>,
}

impl ColumnMap {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize, RecordsError> {
        self.position(name)
            .ok_or_else(|| RecordsError::MissingColumn(name.to_string()))
    }

    pub fn letter(&self, name: &str) -> Option<String> {
        self.position(name).map(column_index_to_letter)
    }
}

pub fn column_position(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

/// Fails on the first required name missing from the headers, before any
/// row is looked at.
pub fn resolve_columns(headers: &[String], required: &[&str]) -> Result<ColumnMap, RecordsError> {
    let mut positions = HashMap::with_capacity(required.len());

    for &name in required {
        let position = column_position(headers, name)
            .ok_or_else(|| RecordsError::MissingColumn(name.to_string()))?;

        positions.insert(name.to_string(), position);
    }

    Ok(ColumnMap { positions })
}

/// First data row whose trimmed id cell equals the trimmed identifier.
pub fn locate_row(grid: &Grid, id_column: usize, identifier: &str) -> Option<usize> {
    let identifier = identifier.trim();

    grid.data_rows().iter().position(|row| {
        row.get(id_column)
            .is_some_and(|cell| cell.trim() == identifier)
    })
}

/// Whether `caller` is the advisor on the given data row, ignoring case and
/// surrounding whitespace. A missing advisor cell only matches a blank caller.
pub fn is_advisor(grid: &Grid, data_index: usize, advisor_column: usize, caller: &str) -> bool {
    let advisor = grid.cell(data_index, advisor_column).unwrap_or_default();

    normalize_name(advisor) == normalize_name(caller)
}
