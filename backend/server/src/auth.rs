//! # Authentication
//!
//! Advisors log in once and get an HS256 token carrying their name. Protected
//! routes run [`authenticate`] first, which puts the decoded [`Claims`] into
//! the request extensions for the handler.
//!
//! - No `Authorization` header, or no token after the scheme: 401
//! - Token present but invalid or expired: 403
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sheets::SheetStore;
use tracing::warn;

use crate::{error::AppError, state::AppState};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub nome: String,
    pub email: String,
    pub exp: i64,
}

pub fn issue_token(
    secret: &str,
    nome: &str,
    email: &str,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let claims = Claims {
        nome: nome.to_string(),
        email: email.to_string(),
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(Box::new(e)))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!("Rejected token: {e}");
        AppError::InvalidToken
    })
}

/// Second word of the `Authorization` header, as in `Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(' ').nth(1))
}

pub async fn authenticate<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::MissingToken)?;
    let claims = verify_token(&state.config.jwt_secret, token)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const SECRET: &str = "segredo-de-teste";

    #[test]
    fn test_round_trip_claims() {
        let token = issue_token(SECRET, "Alice", "alice@escola.br", 1).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.nome, "Alice");
        assert_eq!(claims.email, "alice@escola.br");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_token(SECRET, "Alice", "alice@escola.br", 1).unwrap();

        assert!(matches!(
            verify_token("outro", &token),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(verify_token(SECRET, ""), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let token = issue_token(SECRET, "Alice", "alice@escola.br", -2).unwrap();

        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
