use records::{
    batch::build_dynamic_writes,
    locate::{locate_row, resolve_columns},
    models::RECORD_ID,
    utils::value_text,
};
use serde_json::{Map, Value};
use sheets::SheetStore;
use tracing::info;

use crate::{
    error::AppError,
    state::AppState,
    utils::required,
};

/// Company self-service: writes every submitted field that names a column of
/// the student tab and marks the record completed. Unknown fields are ignored.
pub async fn complete<S: SheetStore>(
    state: &AppState<S>,
    fields: Map<String, Value>,
) -> Result<usize, AppError> {
    let fields: Vec<(String, String)> = fields
        .into_iter()
        .map(|(name, value)| (name, value_text(value)))
        .collect();

    let id = fields
        .iter()
        .find(|(name, _)| name == RECORD_ID)
        .and_then(|(_, value)| required(Some(value.as_str())))
        .ok_or(AppError::MissingField(RECORD_ID))?;

    let grid = state.store.read_grid(&state.student_range()).await?;
    let columns = resolve_columns(grid.headers(), &[RECORD_ID])?;

    let data_index =
        locate_row(&grid, columns.require(RECORD_ID)?, id).ok_or(AppError::NotFound)?;

    let writes = build_dynamic_writes(
        &state.config.student_sheet,
        grid.headers(),
        data_index,
        fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );

    state.store.batch_write(&writes).await?;
    info!("Company completed record {id}, {} cells written", writes.len());

    Ok(writes.len())
}
