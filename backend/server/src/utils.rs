use axum::{Json, extract::rejection::JsonRejection};
use tracing::warn;

use crate::error::AppError;

pub fn get_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected payload: {rejection}");
        AppError::MalformedPayload
    })
}

/// Trimmed value, or `None` when blank.
pub fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required(Some("  R1 ")), Some("R1"));
        assert_eq!(required(Some("   ")), None);
        assert_eq!(required(None), None);
    }
}
