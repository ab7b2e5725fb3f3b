use contracts::usecases::u501_extract_stock_report::ResultRow;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::candidate::CandidateRow;
use super::reconciler::ReconciledPair;

/// Код поставщика в начале описания: 1–3 заглавные буквы и пробел ("PI ", "WW ", "BW ")
static SUPPLIER_PREFIX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[A-Z]{1,3}\s+").ok());

static WHITESPACE_RUN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s{2,}").ok());

fn replace_with(re: &Lazy<Option<Regex>>, text: &str, with: &str, all: bool) -> String {
    match re.as_ref() {
        Some(re) if all => re.replace_all(text, with).into_owned(),
        Some(re) => re.replace(text, with).into_owned(),
        None => text.to_string(),
    }
}

/// Разобрать количество из текста ячейки.
///
/// Пробелы и разделители групп разрядов удаляются до разбора. Отрицательные
/// значения приводятся к 0, дробные отбрасывают дробную часть.
/// `None`: ячейка пустая или не число.
pub fn parse_count(raw: &str) -> Option<u32> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '\'' | '_'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Some(saturate(cleaned.parse::<u128>().unwrap_or(u128::MAX)));
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(from_f64(value))
}

/// Привести значение ячейки к неотрицательному целому; всё непригодное → 0
pub fn coerce_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                saturate(u as u128)
            } else if n.as_i64().is_some() {
                0
            } else {
                n.as_f64().map(from_f64).unwrap_or(0)
            }
        }
        Value::String(s) => parse_count(s).unwrap_or(0),
        _ => 0,
    }
}

fn saturate(value: u128) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn from_f64(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value.trunc() as u32
    }
}

/// Очистка описания: убрать код поставщика в самом начале, схлопнуть пробелы
pub fn normalize_description(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = replace_with(&SUPPLIER_PREFIX, trimmed, "", false);
    replace_with(&WHITESPACE_RUN, &without_prefix, " ", true)
        .trim()
        .to_string()
}

/// Сборка итоговой строки. `None`: строка отбрасывается
/// (пустой артикул или `soh > mpl`).
pub fn normalize(candidate: &CandidateRow, pair: ReconciledPair) -> Option<ResultRow> {
    let article = candidate.article.trim();
    if article.is_empty() {
        return None;
    }
    if pair.soh > pair.mpl {
        return None;
    }

    Some(ResultRow {
        article: article.to_string(),
        description: normalize_description(&candidate.description),
        mpl: pair.mpl,
        soh: pair.soh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_stock_report::reconciler::PairSource;
    use serde_json::json;

    fn pair(mpl: u32, soh: u32) -> ReconciledPair {
        ReconciledPair {
            mpl,
            soh,
            source: PairSource::Header,
        }
    }

    #[test]
    fn test_strip_supplier_prefix() {
        assert_eq!(normalize_description("PI Widget Max"), "Widget Max");
        assert_eq!(normalize_description("WW  Bolt   7mm"), "Bolt 7mm");
        assert_eq!(normalize_description("BW Hose\t\tClamp "), "Hose Clamp");
    }

    #[test]
    fn test_prefix_only_at_start() {
        assert_eq!(normalize_description("Widget PI Max"), "Widget PI Max");
        assert_eq!(normalize_description("Pi Widget"), "Pi Widget");
        assert_eq!(normalize_description("ABCD Widget"), "ABCD Widget");
        assert_eq!(normalize_description("PI"), "PI");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count(" 1,234 "), Some(1234));
        assert_eq!(parse_count("1 234"), Some(1234));
        assert_eq!(parse_count("7.0"), Some(7));
        assert_eq!(parse_count("-3"), Some(0));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("   "), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("99999999999999"), Some(u32::MAX));
    }

    #[test]
    fn test_coerce_count_never_fails() {
        assert_eq!(coerce_count(&json!(10)), 10);
        assert_eq!(coerce_count(&json!(-4)), 0);
        assert_eq!(coerce_count(&json!(4.9)), 4);
        assert_eq!(coerce_count(&json!("2,500")), 2500);
        assert_eq!(coerce_count(&json!("")), 0);
        assert_eq!(coerce_count(&json!("abc")), 0);
        assert_eq!(coerce_count(&Value::Null), 0);
        assert_eq!(coerce_count(&json!(true)), 0);
        assert_eq!(coerce_count(&json!([1, 2])), 0);
    }

    #[test]
    fn test_filter_boundary_is_inclusive() {
        let candidate = CandidateRow {
            article: "1".into(),
            description: "Widget".into(),
            ..Default::default()
        };
        assert!(normalize(&candidate, pair(5, 5)).is_some());
        assert!(normalize(&candidate, pair(5, 6)).is_none());
    }

    #[test]
    fn test_empty_article_is_dropped() {
        let candidate = CandidateRow {
            article: "   ".into(),
            description: "Widget".into(),
            ..Default::default()
        };
        assert!(normalize(&candidate, pair(10, 1)).is_none());
    }

    #[test]
    fn test_article_is_trimmed() {
        let candidate = CandidateRow {
            article: " 12345 ".into(),
            description: "PI Widget".into(),
            ..Default::default()
        };
        let row = normalize(&candidate, pair(10, 4)).unwrap();
        assert_eq!(row.article, "12345");
        assert_eq!(row.description, "Widget");
    }
}
