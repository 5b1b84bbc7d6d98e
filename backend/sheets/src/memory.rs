use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use records::{
    batch::{CellWrite, RangeSpec},
    codec::{Grid, HEADER_ROWS, column_letter_to_index},
};

use crate::{SheetStore, StoreError};

/// Sheets kept in memory, keyed by tab name.
///
/// Records every batch it receives so callers can check what was written,
/// and can be switched into failing to stand in for an unreachable API.
#[derive(Default)]
pub struct MemoryStore {
    sheets: Mutex<HashMap<String, Grid>>,
    batches: Mutex<Vec<Vec<CellWrite>>>,
    reads: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(self, name: &str, grid: Grid) -> Self {
        self.insert_sheet(name, grid);
        self
    }

    pub fn insert_sheet(&self, name: &str, grid: Grid) {
        self.sheets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), grid);
    }

    pub fn sheet(&self, name: &str) -> Option<Grid> {
        self.sheets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    pub fn batches(&self) -> Vec<Vec<CellWrite>> {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }

        Ok(())
    }
}

/// `row` is 1-based and already checked to be non-zero.
fn set_cell(grid: &mut Grid, column: usize, row: usize, value: &str) {
    let row_index = row - 1;

    if grid.rows.len() <= row_index {
        grid.rows.resize_with(row_index + 1, Vec::new);
    }

    let cells = &mut grid.rows[row_index];
    if cells.len() <= column {
        cells.resize(column + 1, String::new());
    }
    cells[column] = value.to_string();
}

impl SheetStore for MemoryStore {
    async fn read_grid(&self, range: &RangeSpec) -> Result<Grid, StoreError> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        match range {
            RangeSpec::Sheet(name) => self
                .sheet(name)
                .ok_or_else(|| StoreError::MissingSheet(name.clone())),
            RangeSpec::Cell { sheet, column, row } => {
                let grid = self
                    .sheet(sheet)
                    .ok_or_else(|| StoreError::MissingSheet(sheet.clone()))?;
                let column = column_letter_to_index(column)?;

                let value = match row.checked_sub(HEADER_ROWS + 1) {
                    Some(data_index) => grid.cell(data_index, column),
                    None if *row == HEADER_ROWS => grid.headers().get(column).map(String::as_str),
                    None => None,
                }
                .map(str::to_string);

                Ok(Grid::new(value.map(|v| vec![vec![v]]).unwrap_or_default()))
            }
        }
    }

    async fn batch_write(&self, writes: &[CellWrite]) -> Result<(), StoreError> {
        self.check_available()?;

        {
            let mut sheets = self
                .sheets
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            // Resolve the whole batch before touching any cell.
            let mut targets = Vec::with_capacity(writes.len());
            for write in writes {
                let RangeSpec::Cell { sheet, column, row } = &write.range else {
                    return Err(StoreError::Range(write.range.to_string()));
                };
                if !sheets.contains_key(sheet) {
                    return Err(StoreError::MissingSheet(sheet.clone()));
                }
                if *row == 0 {
                    return Err(StoreError::Range(write.range.to_string()));
                }

                targets.push((sheet, column_letter_to_index(column)?, *row, &write.value));
            }

            for (sheet, column, row, value) in targets {
                if let Some(grid) = sheets.get_mut(sheet) {
                    set_cell(grid, column, row, value);
                }
            }
        }

        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(writes.to_vec());

        Ok(())
    }
}
