use records::{
    codec::{Record, decode_records},
    filter::{apply_filters, compute_stats, filter_options},
    models::{FilterCriteria, FilterOptions, Stats},
};
use sheets::SheetStore;
use tracing::info;

use crate::{error::AppError, state::AppState};

/// Filtered records plus the stats of that filtered set.
pub async fn search<S: SheetStore>(
    state: &AppState<S>,
    criteria: &FilterCriteria,
) -> Result<(Vec<Record>, Stats), AppError> {
    let grid = state.store.read_grid(&state.student_range()).await?;
    let records = decode_records(&grid);

    let filtered = apply_filters(&records, criteria);
    let stats = compute_stats(&filtered);

    info!("Found {} records", stats.total);

    Ok((filtered.into_iter().cloned().collect(), stats))
}

/// Select options built from every row, not just a filtered view.
pub async fn options<S: SheetStore>(state: &AppState<S>) -> Result<FilterOptions, AppError> {
    let grid = state.store.read_grid(&state.student_range()).await?;

    Ok(filter_options(&decode_records(&grid)))
}
