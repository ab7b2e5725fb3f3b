use contracts::usecases::u501_extract_stock_report::ResultRow;

use super::candidate::CandidateRow;
use super::normalizer::normalize;
use super::reconciler::{reconcile, PairSource};

/// Сводка по обработке набора кандидатов
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub candidates: usize,
    pub from_header: usize,
    pub from_tail: usize,
    pub from_raw_row: usize,
    pub kept: usize,
}

/// Реконсиляция + фильтр для всех строк. Чистая функция: одинаковый вход даёт
/// одинаковый результат.
pub fn process(candidates: &[CandidateRow]) -> (Vec<ResultRow>, ReconcileStats) {
    let mut stats = ReconcileStats {
        candidates: candidates.len(),
        ..Default::default()
    };

    let rows: Vec<ResultRow> = candidates
        .iter()
        .filter_map(|candidate| {
            let pair = reconcile(candidate);
            match pair.source {
                PairSource::Header => stats.from_header += 1,
                PairSource::Tail => stats.from_tail += 1,
                PairSource::RawRow => stats.from_raw_row += 1,
            }
            tracing::debug!(
                article = %candidate.article.trim(),
                source = ?pair.source,
                mpl = pair.mpl,
                soh = pair.soh,
                "Row reconciled"
            );
            normalize(candidate, pair)
        })
        .collect();

    stats.kept = rows.len();
    (rows, stats)
}
