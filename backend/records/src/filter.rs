//! # Filters
//!
//! Student search is an AND of seven independent predicates. A predicate with
//! no criterion passes everything, so any subset of the fields can be sent.
//!
//! | criterion    | column                | match                          |
//! |--------------|-----------------------|--------------------------------|
//! | `status`     | `statusPreenchimento` | exact                          |
//! | `curso`      | `curso`               | exact                          |
//! | `orientador` | `nome-orientador`     | exact                          |
//! | `turma`      | `turma-fase`          | exact                          |
//! | `nome`       | `nome-completo`       | case-insensitive substring     |
//! | `ano`        | `matricula`           | prefix                         |
//! | `cpf`        | `cpf`                 | digits-only substring          |
//!
//! The last three fail on rows where the column is absent.
use std::collections::BTreeSet;

use crate::{
    codec::Record,
    models::{
        ADVISOR, COHORT, COURSE, ENROLLMENT, FULL_NAME, FilterCriteria, FilterOptions, STATUS,
        STATUS_COMPLETED, STATUS_PENDING, Stats, TAX_ID,
    },
    utils::{active, digits_only},
};

const YEAR_LEN: usize = 4;

pub fn apply_filters<'a>(records: &'a [Record], criteria: &FilterCriteria) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .collect()
}

pub fn matches(record: &Record, criteria: &FilterCriteria) -> bool {
    equals(record, STATUS, &criteria.status)
        && equals(record, COURSE, &criteria.curso)
        && equals(record, ADVISOR, &criteria.orientador)
        && equals(record, COHORT, &criteria.turma)
        && name_contains(record, &criteria.nome)
        && enrolled_in(record, &criteria.ano)
        && tax_id_contains(record, &criteria.cpf)
}

fn equals(record: &Record, field: &str, criterion: &Option<String>) -> bool {
    match active(criterion) {
        Some(expected) => record.get(field) == Some(expected),
        None => true,
    }
}

fn name_contains(record: &Record, criterion: &Option<String>) -> bool {
    let Some(needle) = active(criterion) else {
        return true;
    };

    record
        .get(FULL_NAME)
        .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase()))
}

fn enrolled_in(record: &Record, criterion: &Option<String>) -> bool {
    let Some(year) = active(criterion) else {
        return true;
    };

    record
        .get(ENROLLMENT)
        .is_some_and(|enrollment| enrollment.starts_with(year))
}

fn tax_id_contains(record: &Record, criterion: &Option<String>) -> bool {
    let digits = active(criterion).map(digits_only).unwrap_or_default();
    if digits.is_empty() {
        return true;
    }

    record
        .get(TAX_ID)
        .is_some_and(|tax_id| digits_only(tax_id).contains(&digits))
}

pub fn compute_stats(records: &[&Record]) -> Stats {
    let mut stats = Stats {
        total: records.len(),
        ..Stats::default()
    };

    for record in records {
        let Some(status) = record.get(STATUS) else {
            continue;
        };

        match status.trim().to_uppercase().as_str() {
            STATUS_COMPLETED => stats.completos += 1,
            STATUS_PENDING => stats.pendentes += 1,
            _ => {}
        }
    }

    stats
}

/// Distinct non-empty values of one column, ascending.
pub fn distinct_values(records: &[Record], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.get(field))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Enrollment years taken from the first four characters of `matricula`,
/// newest first.
pub fn enrollment_years(records: &[Record]) -> Vec<String> {
    let mut years: Vec<String> = records
        .iter()
        .filter_map(|record| record.get(ENROLLMENT))
        .map(|enrollment| enrollment.chars().take(YEAR_LEN).collect::<String>())
        .filter(|year| !year.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    years.sort_by(|a, b| match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(a), Ok(b)) => b.cmp(&a),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => b.cmp(a),
    });

    years
}

pub fn filter_options(records: &[Record]) -> FilterOptions {
    FilterOptions {
        status: distinct_values(records, STATUS),
        cursos: distinct_values(records, COURSE),
        orientadores: distinct_values(records, ADVISOR),
        turmas: distinct_values(records, COHORT),
        anos: enrollment_years(records),
    }
}
