use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use records::{
    codec::Record,
    models::{FilterCriteria, FilterOptions},
};
use serde_json::{Map, Value, json};
use sheets::SheetStore;
use tracing::info;

use crate::{
    auth::Claims,
    error::AppError,
    grades::update_grades,
    login::login,
    models::{ApiResponse, GradeResult, GradeUpdate, LoginRequest},
    registration::complete,
    state::AppState,
    students::{options, search},
    utils::get_payload,
};

pub async fn hello_handler() -> impl IntoResponse {
    Json(json!({ "message": "API do Sistema de Estágios está online!" }))
}

pub async fn login_handler<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let request = get_payload(payload)?;
    let (token, user) = login(&state, &request).await?;

    Ok(Json(ApiResponse::session(token, user)))
}

pub async fn filter_options_handler<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiResponse<FilterOptions>>, AppError> {
    Ok(Json(ApiResponse::ok(options(&state).await?)))
}

pub async fn student_data_handler<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Claims>,
    payload: Result<Json<FilterCriteria>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<Record>>>, AppError> {
    let criteria = get_payload(payload)?;
    info!("User '{}' is searching student data", caller.nome);

    let (records, stats) = search(&state, &criteria).await?;

    Ok(Json(ApiResponse::ok(records).with_stats(stats)))
}

pub async fn update_grades_handler<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Claims>,
    payload: Result<Json<GradeUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<GradeResult>>, AppError> {
    let update = get_payload(payload)?;
    let result = update_grades(&state, &caller, &update).await?;

    Ok(Json(
        ApiResponse::ok(result).with_message("Notas atualizadas com sucesso!"),
    ))
}

pub async fn complete_registration_handler<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let fields = get_payload(payload)?;
    complete(&state, fields).await?;

    Ok(Json(ApiResponse::done(
        "Dados da empresa registados com sucesso!",
    )))
}

#[cfg(test)]
mod tests {
    use records::codec::Grid;
    use sheets::MemoryStore;

    use super::*;
    use crate::config::Config;

    fn state() -> Arc<AppState<MemoryStore>> {
        let store = MemoryStore::new().with_sheet(
            "Página1",
            Grid::from(vec![
                vec![
                    "idRegistro",
                    "statusPreenchimento",
                    "nome-orientador",
                    "cpf",
                    "Nota Supervisor",
                    "Nota Relatório",
                    "Nota da Defesa",
                    "Média",
                    "Observações",
                ],
                vec!["R1", "ALUNO", "Alice", "123.456.789-00"],
                vec!["R2", "CONCLUÍDO", "Bob", "987.654.321-00"],
            ]),
        );

        AppState::new(Config::default(), store)
    }

    fn alice() -> Extension<Claims> {
        Extension(Claims {
            nome: "Alice".to_string(),
            email: "alice@escola.br".to_string(),
            exp: 0,
        })
    }

    #[tokio::test]
    async fn test_student_data_envelope() {
        let criteria = FilterCriteria {
            cpf: Some("45678".to_string()),
            ..Default::default()
        };

        let Json(response) = student_data_handler(State(state()), alice(), Ok(Json(criteria)))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "data": [{
                    "idRegistro": "R1",
                    "statusPreenchimento": "ALUNO",
                    "nome-orientador": "Alice",
                    "cpf": "123.456.789-00"
                }],
                "stats": { "total": 1, "completos": 0, "pendentes": 1 }
            })
        );
    }

    #[tokio::test]
    async fn test_update_grades_envelope() {
        let update: GradeUpdate = serde_json::from_value(json!({
            "idRegistro": "R1",
            "notaSupervisor": "0",
            "notaRelatorio": "",
            "notaDefesa": 10
        }))
        .unwrap();

        let Json(response) = update_grades_handler(State(state()), alice(), Ok(Json(update)))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "data": { "media": "10,00" },
                "message": "Notas atualizadas com sucesso!"
            })
        );
    }

    #[tokio::test]
    async fn test_update_grades_forbidden() {
        let update = GradeUpdate {
            id_registro: Some("R2".to_string()),
            ..Default::default()
        };

        let result = update_grades_handler(State(state()), alice(), Ok(Json(update))).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_complete_registration() {
        let state = state();
        let fields = Map::from_iter([
            ("idRegistro".to_string(), json!("R2")),
            ("Observações".to_string(), json!("Contrato assinado")),
        ]);

        let Json(response) = complete_registration_handler(State(state.clone()), Ok(Json(fields)))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(
            state.store.sheet("Página1").unwrap().cell(1, 8),
            Some("Contrato assinado")
        );
    }
}
