//! Выбор авторитетной пары (MPL, SOH) для строки-кандидата.
//!
//! Порядок приоритетов фиксирован: пара из колонок с заголовками → проверка
//! на перестановку/подмену колонки → позиционная тройка справа → числа из
//! сырого текста строки (только если позиционная тройка пустая).
//! Функция никогда не отказывает: фильтрация выполняется в нормализаторе.

use serde::Serialize;

use super::candidate::CandidateRow;
use super::normalizer::{coerce_count, parse_count};

/// Откуда взята итоговая пара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairSource {
    Header,
    Tail,
    RawRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconciledPair {
    pub mpl: u32,
    pub soh: u32,
    pub source: PairSource,
}

/// Тройка крайних правых чисел строки в порядке SOH, MPL, Capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TailTrio {
    soh: u32,
    mpl: u32,
    capacity: u32,
}

impl TailTrio {
    fn is_blank(&self) -> bool {
        self.soh == 0 && self.mpl == 0 && self.capacity == 0
    }
}

fn label_is(label: &str, expected: &str) -> bool {
    label.trim().to_uppercase() == expected
}

/// Заголовочная пара совпадает с колонкой Capacity или переставлена местами
fn looks_swapped(header_mpl: u32, header_soh: u32, tail: &TailTrio) -> bool {
    let capacity_leak = header_mpl == tail.capacity && tail.mpl != tail.capacity;
    let classic_swap = header_mpl == tail.soh && header_soh == tail.mpl;
    capacity_leak || classic_swap
}

/// Последние три целых числа в сыром тексте строки: SOH, MPL, Capacity
fn trio_from_raw_row(raw_row: &str) -> Option<TailTrio> {
    let numbers: Vec<u32> = raw_row
        .split(|c: char| c.is_whitespace() || matches!(c, '|' | ';' | '\t'))
        .filter_map(|token| {
            let token = token.trim_matches(|c: char| !c.is_ascii_digit() && c != ',');
            if token.is_empty() || !token.chars().any(|c| c.is_ascii_digit()) {
                return None;
            }
            parse_count(token)
        })
        .collect();

    if numbers.len() < 3 {
        return None;
    }
    let tail = &numbers[numbers.len() - 3..];
    Some(TailTrio {
        soh: tail[0],
        mpl: tail[1],
        capacity: tail[2],
    })
}

pub fn reconcile(candidate: &CandidateRow) -> ReconciledPair {
    let header_looks_right = label_is(&candidate.header_mpl_label, "MPL")
        && label_is(&candidate.header_soh_label, "SOH");

    let header_mpl = coerce_count(&candidate.header_mpl);
    let header_soh = coerce_count(&candidate.header_soh);
    let tail = TailTrio {
        soh: coerce_count(&candidate.tail_soh),
        mpl: coerce_count(&candidate.tail_mpl),
        capacity: coerce_count(&candidate.tail_capacity),
    };

    let spurious_zero = header_mpl == 0 && tail.mpl > 0;
    let header_usable =
        header_looks_right && !looks_swapped(header_mpl, header_soh, &tail) && !spurious_zero;

    if header_usable {
        return ReconciledPair {
            mpl: header_mpl,
            soh: header_soh,
            source: PairSource::Header,
        };
    }

    if tail.is_blank() {
        if let Some(raw) = trio_from_raw_row(&candidate.raw_row) {
            return ReconciledPair {
                mpl: raw.mpl,
                soh: raw.soh,
                source: PairSource::RawRow,
            };
        }
    }

    ReconciledPair {
        mpl: tail.mpl,
        soh: tail.soh,
        source: PairSource::Tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(
        header_mpl: serde_json::Value,
        header_soh: serde_json::Value,
        tail: (u32, u32, u32),
    ) -> CandidateRow {
        CandidateRow {
            article: "12345".into(),
            description: "PI Widget".into(),
            header_mpl,
            header_soh,
            header_mpl_label: "MPL".into(),
            header_soh_label: "SOH".into(),
            tail_soh: json!(tail.0),
            tail_mpl: json!(tail.1),
            tail_capacity: json!(tail.2),
            raw_row: String::new(),
        }
    }

    #[test]
    fn test_header_pair_when_consistent() {
        let pair = reconcile(&candidate(json!(10), json!(4), (4, 10, 20)));
        assert_eq!((pair.mpl, pair.soh, pair.source), (10, 4, PairSource::Header));
    }

    #[test]
    fn test_capacity_leak_falls_back_to_tail() {
        // Заголовок MPL случайно прочитан из колонки Capacity
        let pair = reconcile(&candidate(json!(20), json!(10), (4, 10, 20)));
        assert_eq!((pair.mpl, pair.soh, pair.source), (10, 4, PairSource::Tail));
    }

    #[test]
    fn test_capacity_equal_to_mpl_is_not_a_leak() {
        let pair = reconcile(&candidate(json!(10), json!(3), (4, 10, 10)));
        assert_eq!(pair.source, PairSource::Header);
        assert_eq!((pair.mpl, pair.soh), (10, 3));
    }

    #[test]
    fn test_classic_swap_falls_back_to_tail() {
        let pair = reconcile(&candidate(json!(4), json!(10), (4, 10, 20)));
        assert_eq!((pair.mpl, pair.soh, pair.source), (10, 4, PairSource::Tail));
    }

    #[test]
    fn test_zero_header_guard() {
        let pair = reconcile(&candidate(json!(0), json!(0), (3, 8, 12)));
        assert_eq!((pair.mpl, pair.soh, pair.source), (8, 3, PairSource::Tail));
    }

    #[test]
    fn test_wrong_labels_fall_back_to_tail() {
        let mut row = candidate(json!(10), json!(4), (2, 6, 9));
        row.header_mpl_label = "Min Qty".into();
        let pair = reconcile(&row);
        assert_eq!((pair.mpl, pair.soh, pair.source), (6, 2, PairSource::Tail));
    }

    #[test]
    fn test_labels_are_case_and_space_insensitive() {
        let mut row = candidate(json!(10), json!(4), (4, 10, 20));
        row.header_mpl_label = " mpl ".into();
        row.header_soh_label = "soh".into();
        assert_eq!(reconcile(&row).source, PairSource::Header);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let pair = reconcile(&candidate(json!("1,200"), json!(" 40 "), (40, 1200, 2000)));
        assert_eq!((pair.mpl, pair.soh), (1200, 40));
    }

    #[test]
    fn test_blank_cells_become_zero() {
        let mut row = candidate(json!(""), json!(null), (0, 0, 0));
        row.header_mpl_label = String::new();
        let pair = reconcile(&row);
        assert_eq!((pair.mpl, pair.soh), (0, 0));
    }

    #[test]
    fn test_raw_row_used_only_when_tail_blank() {
        let mut row = candidate(json!(0), json!(0), (0, 0, 0));
        row.header_mpl_label = "MIN".into();
        row.raw_row = "12345 PI Widget 2 7 1,000".into();
        let pair = reconcile(&row);
        assert_eq!((pair.mpl, pair.soh, pair.source), (7, 2, PairSource::RawRow));

        let mut row = candidate(json!(0), json!(0), (1, 5, 9));
        row.header_mpl_label = "MIN".into();
        row.raw_row = "12345 PI Widget 2 7 1,000".into();
        assert_eq!(reconcile(&row).source, PairSource::Tail);
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let row = candidate(json!(20), json!(10), (4, 10, 20));
        assert_eq!(reconcile(&row), reconcile(&row));
    }
}
