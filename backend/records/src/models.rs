use serde::{Deserialize, Serialize};

use crate::utils::lenient_text;

pub const STATUS: &str = "statusPreenchimento";
pub const COURSE: &str = "curso";
pub const ADVISOR: &str = "nome-orientador";
pub const COHORT: &str = "turma-fase";
pub const FULL_NAME: &str = "nome-completo";
pub const ENROLLMENT: &str = "matricula";
pub const TAX_ID: &str = "cpf";
pub const RECORD_ID: &str = "idRegistro";

pub const SUPERVISOR_GRADE: &str = "Nota Supervisor";
pub const REPORT_GRADE: &str = "Nota Relatório";
pub const DEFENSE_GRADE: &str = "Nota da Defesa";
pub const AVERAGE: &str = "Média";
pub const REMARKS: &str = "Observações";

pub const STATUS_COMPLETED: &str = "CONCLUÍDO";
pub const STATUS_PENDING: &str = "ALUNO";

/// Body of the student search. Every field is optional and empty strings
/// behave like missing ones. Numbers are taken as their text (`"ano": 2023`).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct FilterCriteria {
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub curso: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub orientador: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub turma: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub nome: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub ano: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub cpf: Option<String>,
}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completos: usize,
    pub pendentes: usize,
}

#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub status: Vec<String>,
    pub cursos: Vec<String>,
    pub orientadores: Vec<String>,
    pub turmas: Vec<String>,
    pub anos: Vec<String>,
}

/// Headers touched by a grade update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeColumns {
    pub id: String,
    pub advisor: String,
    pub supervisor: String,
    pub report: String,
    pub defense: String,
    pub average: String,
    pub remarks: String,
}

impl Default for GradeColumns {
    fn default() -> Self {
        Self {
            id: RECORD_ID.to_string(),
            advisor: ADVISOR.to_string(),
            supervisor: SUPERVISOR_GRADE.to_string(),
            report: REPORT_GRADE.to_string(),
            defense: DEFENSE_GRADE.to_string(),
            average: AVERAGE.to_string(),
            remarks: REMARKS.to_string(),
        }
    }
}

impl GradeColumns {
    /// Every column the update needs, in resolution order.
    pub fn required(&self) -> [&str; 7] {
        [
            &self.id,
            &self.advisor,
            &self.supervisor,
            &self.report,
            &self.defense,
            &self.average,
            &self.remarks,
        ]
    }
}
