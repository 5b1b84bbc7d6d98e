//! # Grade Entry
//!
//! 1. Reject the request if it has no `idRegistro`, before touching the sheet
//! 2. Read the student tab and resolve every grade column, failing on the first missing one
//! 3. Find the row, then check the caller is that row's advisor
//! 4. Write the three grades, the average and the remarks in one batch
use records::{
    batch::build_row_writes,
    grades::average,
    locate::{is_advisor, locate_row, resolve_columns},
};
use sheets::SheetStore;
use tracing::{info, warn};

use crate::{
    auth::Claims,
    error::AppError,
    models::{GradeResult, GradeUpdate},
    state::AppState,
    utils::required,
};

pub async fn update_grades<S: SheetStore>(
    state: &AppState<S>,
    caller: &Claims,
    update: &GradeUpdate,
) -> Result<GradeResult, AppError> {
    let id = required(update.id_registro.as_deref())
        .ok_or(AppError::MissingField("idRegistro"))?;

    let grid = state.store.read_grid(&state.student_range()).await?;
    let names = &state.config.grade_columns;
    let columns = resolve_columns(grid.headers(), &names.required())?;

    let data_index =
        locate_row(&grid, columns.require(&names.id)?, id).ok_or(AppError::NotFound)?;

    if !is_advisor(&grid, data_index, columns.require(&names.advisor)?, &caller.nome) {
        warn!("'{}' tried to grade record {id} of another advisor", caller.nome);
        return Err(AppError::Forbidden);
    }

    let media = average([
        update.nota_supervisor.as_deref(),
        update.nota_relatorio.as_deref(),
        update.nota_defesa.as_deref(),
    ]);

    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let writes = build_row_writes(
        &state.config.student_sheet,
        data_index,
        [
            (columns.require(&names.supervisor)?, text(&update.nota_supervisor)),
            (columns.require(&names.report)?, text(&update.nota_relatorio)),
            (columns.require(&names.defense)?, text(&update.nota_defesa)),
            (columns.require(&names.average)?, media.clone()),
            (columns.require(&names.remarks)?, text(&update.observacoes)),
        ],
    );

    state.store.batch_write(&writes).await?;
    info!("'{}' updated grades of record {id}, average '{media}'", caller.nome);

    Ok(GradeResult { media })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use records::{codec::Grid, models::GradeColumns};
    use sheets::MemoryStore;

    use super::*;
    use crate::config::Config;

    const HEADERS: [&str; 8] = [
        "idRegistro",
        "nome-completo",
        "nome-orientador",
        "Nota Supervisor",
        "Nota Relatório",
        "Nota da Defesa",
        "Média",
        "Observações",
    ];

    fn state(headers: &[&str]) -> Arc<AppState<MemoryStore>> {
        let store = MemoryStore::new().with_sheet(
            "Página1",
            Grid::from(vec![
                headers.to_vec(),
                vec!["R1", "Ana Souza", " Carla Mendes "],
                vec!["R2", "Bruno Lima", "Davi"],
            ]),
        );

        AppState::new(Config::default(), store)
    }

    fn caller(nome: &str) -> Claims {
        Claims {
            nome: nome.to_string(),
            email: "orientador@escola.br".to_string(),
            exp: 0,
        }
    }

    fn update(id: &str) -> GradeUpdate {
        GradeUpdate {
            id_registro: Some(id.to_string()),
            nota_supervisor: Some("8,5".to_string()),
            nota_relatorio: Some("9,0".to_string()),
            nota_defesa: Some("7,75".to_string()),
            observacoes: Some("Bom trabalho".to_string()),
        }
    }

    #[tokio::test]
    async fn test_writes_grades_and_average() {
        let state = state(&HEADERS);

        let result = update_grades(&state, &caller("carla mendes"), &update(" R1 "))
            .await
            .unwrap();
        assert_eq!(result.media, "8,42");

        let batches = state.store.batches();
        assert_eq!(batches.len(), 1);

        let ranges: Vec<String> = batches[0].iter().map(|w| w.range.to_string()).collect();
        assert_eq!(
            ranges,
            vec!["Página1!D2", "Página1!E2", "Página1!F2", "Página1!G2", "Página1!H2"]
        );

        let grid = state.store.sheet("Página1").unwrap();
        assert_eq!(grid.cell(0, 6), Some("8,42"));
        assert_eq!(grid.cell(0, 7), Some("Bom trabalho"));
    }

    #[tokio::test]
    async fn test_missing_id_makes_no_call() {
        let state = state(&HEADERS);
        let request = GradeUpdate {
            id_registro: Some("  ".to_string()),
            ..update("R1")
        };

        assert!(matches!(
            update_grades(&state, &caller("Carla Mendes"), &request).await,
            Err(AppError::MissingField("idRegistro"))
        ));
        assert_eq!(state.store.reads(), 0);
    }

    #[tokio::test]
    async fn test_missing_column_writes_nothing() {
        let state = state(&HEADERS[..7]);

        let result = update_grades(&state, &caller("Carla Mendes"), &update("R1")).await;

        assert!(matches!(
            result,
            Err(AppError::MissingColumn(column)) if column == "Observações"
        ));
        assert!(state.store.batches().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let state = state(&HEADERS);

        assert!(matches!(
            update_grades(&state, &caller("Carla Mendes"), &update("r1")).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_other_advisor_is_forbidden() {
        let state = state(&HEADERS);

        assert!(matches!(
            update_grades(&state, &caller("Carla Mendes"), &update("R2")).await,
            Err(AppError::Forbidden)
        ));
        assert!(state.store.batches().is_empty());
    }

    #[tokio::test]
    async fn test_no_valid_grades_clears_average() {
        let state = state(&HEADERS);
        let request = GradeUpdate {
            id_registro: Some("R1".to_string()),
            nota_supervisor: Some("0".to_string()),
            ..Default::default()
        };

        let result = update_grades(&state, &caller("Carla Mendes"), &request)
            .await
            .unwrap();

        assert_eq!(result.media, "");
        assert_eq!(state.store.sheet("Página1").unwrap().cell(0, 6), Some(""));
    }

    #[tokio::test]
    async fn test_two_column_sheet() {
        let columns = GradeColumns {
            id: "id".to_string(),
            advisor: "adv".to_string(),
            ..Default::default()
        };
        let store = MemoryStore::new().with_sheet(
            "Página1",
            Grid::from(vec![
                vec![
                    "id",
                    "adv",
                    "Nota Supervisor",
                    "Nota Relatório",
                    "Nota da Defesa",
                    "Média",
                    "Observações",
                ],
                vec!["A1", "Alice"],
                vec!["A2", "Bob"],
            ]),
        );
        let state = AppState::new(
            Config {
                grade_columns: columns,
                ..Config::default()
            },
            store,
        );

        assert!(update_grades(&state, &caller("Alice"), &update("A1")).await.is_ok());
        assert!(matches!(
            update_grades(&state, &caller("Alice"), &update("A2")).await,
            Err(AppError::Forbidden)
        ));
    }
}
