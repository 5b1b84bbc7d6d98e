use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use records::RecordsError;
use sheets::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ApiResponse;

const GENERIC_FAILURE: &str = "Ocorreu um erro no servidor.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Corpo do pedido inválido.")]
    MalformedPayload,

    #[error("Campo obrigatório em falta: {0}.")]
    MissingField(&'static str),

    #[error("Coluna obrigatória não encontrada na planilha: {0}.")]
    MissingColumn(String),

    #[error("Registo não encontrado.")]
    NotFound,

    #[error("Não tem permissão para alterar este registo.")]
    Forbidden,

    #[error("Acesso negado. Token não fornecido.")]
    MissingToken,

    #[error("Token inválido ou expirado.")]
    InvalidToken,

    #[error("Email ou senha inválidos.")]
    InvalidCredentials,

    #[error("Upstream error: {0}")]
    Upstream(#[from] StoreError),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<RecordsError> for AppError {
    fn from(e: RecordsError) -> Self {
        match e {
            RecordsError::MissingColumn(column) => AppError::MissingColumn(column),
            other => AppError::InternalError(Box::new(other)),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload | AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::MissingToken | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MissingColumn(_) | AppError::Upstream(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Upstream(_) | AppError::InternalError(_) => {
                error!("Request failed: {self}");
                GENERIC_FAILURE.to_string()
            }
            AppError::MissingColumn(_) => {
                error!("Spreadsheet layout changed: {self}");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
