use records::{models::Stats, utils::lenient_text};
use serde::{Deserialize, Serialize};

/// Envelope shared by every endpoint. Absent parts are left out of the JSON.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

impl<T> ApiResponse<T> {
    fn empty(success: bool) -> Self {
        Self {
            success,
            data: None,
            stats: None,
            message: None,
            token: None,
            user: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(true)
        }
    }

    pub fn done(message: impl Into<String>) -> Self {
        Self::empty(true).with_message(message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::empty(false).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }
}

impl ApiResponse<()> {
    pub fn session(token: String, user: UserInfo) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            ..Self::empty(true)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub nome: String,
    pub email: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub senha: Option<String>,
}

/// Grades may arrive as JSON strings (`"8,5"`), numbers or null.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct GradeUpdate {
    #[serde(deserialize_with = "lenient_text")]
    pub id_registro: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub nota_supervisor: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub nota_relatorio: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub nota_defesa: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub observacoes: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct GradeResult {
    pub media: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_envelope_skips_absent_parts() {
        let response = ApiResponse::ok(vec![1, 2]).with_stats(Stats {
            total: 2,
            completos: 1,
            pendentes: 0,
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "data": [1, 2],
                "stats": { "total": 2, "completos": 1, "pendentes": 0 }
            })
        );
    }

    #[test]
    fn test_grade_update_accepts_numbers() {
        let update: GradeUpdate = serde_json::from_value(json!({
            "idRegistro": 42,
            "notaSupervisor": "8,5",
            "notaRelatorio": 9.5,
            "notaDefesa": null
        }))
        .unwrap();

        assert_eq!(update.id_registro.as_deref(), Some("42"));
        assert_eq!(update.nota_supervisor.as_deref(), Some("8,5"));
        assert_eq!(update.nota_relatorio.as_deref(), Some("9.5"));
        assert_eq!(update.nota_defesa, None);
        assert_eq!(update.observacoes, None);
    }
}
