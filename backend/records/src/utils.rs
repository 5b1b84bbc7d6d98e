use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

pub fn digits_only(input: &str) -> String {
    NON_DIGITS.replace_all(input, "").into_owned()
}

/// Text of a JSON value as it should land in a cell or a criterion.
pub fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Accepts numbers and booleans where text is expected, `null` reads as missing.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .filter(|value| !value.is_null())
        .map(value_text))
}

/// Trimmed and lowercased, for comparing people's names.
pub fn normalize_name(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Criteria that are missing or empty never filter anything out.
pub fn active(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("123.456.789-00"), "12345678900");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn test_digits_only_ascii() {
        assert_eq!(digits_only("１２３"), "");
        assert_eq!(digits_only("١٢٣"), "");
        assert_eq!(digits_only("12٣"), "12");
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(json!("ACME")), "ACME");
        assert_eq!(value_text(json!(12)), "12");
        assert_eq!(value_text(json!(true)), "true");
        assert_eq!(value_text(Value::Null), "");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Maria SILVA "), "maria silva");
        assert_eq!(normalize_name("ÉRICA"), "érica");
    }

    #[test]
    fn test_active() {
        assert_eq!(active(&None), None);
        assert_eq!(active(&Some(String::new())), None);
        assert_eq!(active(&Some(" ".to_string())), Some(" "));
    }
}
