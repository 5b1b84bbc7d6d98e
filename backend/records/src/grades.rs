//! # Grades
//!
//! The sheet stores grades as text in the Brazilian format (`8,5`). The
//! average written to `Média` must look the same, always with two decimals.
//!
//! - Missing grades and grades that are not numbers are left out of the
//!   average, they do not count as zero
//! - Zero is treated as "not graded yet" and also left out
//! - No grades at all gives an empty cell
use std::sync::LazyLock;

use regex::Regex;

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap()
});

const DECIMALS: usize = 2;

/// Parses the longest numeric prefix, like a browser's `parseFloat`.
///
/// Empty input reads as `"0"`. Anything without a numeric prefix is NaN.
pub fn parse_locale_number(input: Option<&str>) -> f64 {
    let raw = input.filter(|value| !value.is_empty()).unwrap_or("0");
    let normalized = raw.replacen(',', ".", 1);

    LEADING_FLOAT
        .find(normalized.trim_start())
        .and_then(|found| found.as_str().parse().ok())
        .unwrap_or(f64::NAN)
}

pub fn average<'a, I>(grades: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let valid: Vec<f64> = grades
        .into_iter()
        .map(parse_locale_number)
        .filter(|grade| grade.is_finite() && *grade > 0.0)
        .collect();

    if valid.is_empty() {
        return String::new();
    }

    let mean = valid.iter().sum::<f64>() / valid.len() as f64;

    to_fixed(mean).replace('.', ",")
}

/// Two decimals, halves rounded away from zero on the exact binary value.
///
/// `format!("{:.2}")` breaks exact ties to even (`0.125` gives `0.12`), the
/// sheet expects `0.13`.
fn to_fixed(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value:.2}");
    }

    // Exact decimal expansion for anything grade sized.
    let exact = format!("{:.80}", value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return format!("{value:.2}");
    };

    let (kept, rest) = fraction.split_at(DECIMALS);
    let round_up = rest.as_bytes().first().is_some_and(|&digit| digit >= b'5');

    let Ok(mut scaled) = format!("{whole}{kept}").parse::<u128>() else {
        return format!("{value:.2}");
    };
    if round_up {
        scaled += 1;
    }

    let unit = 10u128.pow(DECIMALS as u32);
    let sign = if value < 0.0 && scaled != 0 { "-" } else { "" };

    format!(
        "{sign}{}.{:0width$}",
        scaled / unit,
        scaled % unit,
        width = DECIMALS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_number() {
        assert_eq!(parse_locale_number(Some("8,5")), 8.5);
        assert_eq!(parse_locale_number(Some("7.75")), 7.75);
        assert_eq!(parse_locale_number(Some(" 9")), 9.0);
        assert_eq!(parse_locale_number(Some("6,5 pontos")), 6.5);
        assert_eq!(parse_locale_number(Some("")), 0.0);
        assert_eq!(parse_locale_number(None), 0.0);
        assert!(parse_locale_number(Some("abc")).is_nan());
        assert!(parse_locale_number(Some(",")).is_nan());
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(parse_locale_number(Some("8٥")), 8.0);
        assert_eq!(parse_locale_number(Some("7,٥")), 7.0);
        assert!(parse_locale_number(Some("８")).is_nan());
        assert_eq!(average([Some("8٥"), Some("９")]), "8,00");
    }

    #[test]
    fn test_average_locale_format() {
        assert_eq!(average([Some("8,5"), Some("9,0"), Some("7,75")]), "8,42");
    }

    #[test]
    fn test_average_skips_zero_and_empty() {
        assert_eq!(average([Some("0"), Some(""), Some("10")]), "10,00");
        assert_eq!(average([None, Some("7"), Some("nota")]), "7,00");
    }

    #[test]
    fn test_average_nothing_valid() {
        assert_eq!(average([None, None, None]), "");
        assert_eq!(average([Some("0"), Some("0,0"), Some("")]), "");
        assert_eq!(average([Some("x"), Some("-5"), None]), "");
    }

    #[test]
    fn test_exact_halves_round_up() {
        assert_eq!(to_fixed(0.125), "0.13");
        assert_eq!(to_fixed(8.375), "8.38");
        assert_eq!(to_fixed(9.995), "9.99");
        assert_eq!(to_fixed(9.999), "10.00");
        assert_eq!(average([Some("8,25"), Some("8,5")]), "8,38");
    }
}
