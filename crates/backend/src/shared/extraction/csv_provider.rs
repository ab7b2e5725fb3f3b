//! Локальный разбор CSV-отчётов: файл не покидает сервер, но результат имеет
//! ту же форму `{ "rows": [...] }`, что и у LLM-провайдера.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::{ExtractionError, ExtractionProvider, ExtractionRequest, StagedDocument};
use crate::domain::a001_stock_report::normalizer::parse_count;

const ARTICLE_KEYWORDS: [&str; 4] = ["ARTICLE", "ITEM", "SKU", "CODE"];
const DESCRIPTION_KEYWORDS: [&str; 1] = ["DESC"];

pub struct CsvTableProvider;

/// Разметка колонок по строке заголовков
#[derive(Debug)]
struct HeaderMap {
    article: usize,
    description: Option<usize>,
    mpl: Option<(usize, String)>,
    soh: Option<(usize, String)>,
}

fn normalize_header(cell: &str) -> String {
    cell.trim().to_uppercase()
}

fn is_header_record(record: &csv::StringRecord) -> bool {
    record
        .iter()
        .map(normalize_header)
        .any(|cell| cell == "MPL" || cell == "SOH")
}

fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| keywords.iter().any(|k| h.contains(k)))
}

impl HeaderMap {
    fn from_record(record: &csv::StringRecord) -> Self {
        let headers: Vec<String> = record.iter().map(normalize_header).collect();
        let exact = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .map(|i| (i, record.get(i).unwrap_or("").trim().to_string()))
        };

        let article = find_column(&headers, &ARTICLE_KEYWORDS).unwrap_or(0);
        let description = find_column(&headers, &DESCRIPTION_KEYWORDS)
            .or_else(|| (headers.len() > 1 && article != 1).then_some(1));

        Self {
            article,
            description,
            mpl: exact("MPL"),
            soh: exact("SOH"),
        }
    }
}

/// Три крайние правые числовые ячейки в порядке слева направо
fn tail_trio(record: &csv::StringRecord, skip: &[usize]) -> [u32; 3] {
    let cells: Vec<&str> = record.iter().collect();
    let mut numeric: Vec<u32> = cells
        .iter()
        .copied()
        .enumerate()
        .rev()
        .filter(|(i, _)| !skip.contains(i))
        .filter_map(|(_, cell)| parse_count(cell))
        .take(3)
        .collect();
    numeric.reverse();

    let mut trio = [0u32; 3];
    let offset = 3 - numeric.len();
    for (i, value) in numeric.into_iter().enumerate() {
        trio[offset + i] = value;
    }
    trio
}

fn cell(record: &csv::StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| record.get(i))
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Разбор CSV в документ `{ "rows": [...] }`
pub fn parse_csv(bytes: &[u8]) -> Result<Value, ExtractionError> {
    let text = String::from_utf8_lossy(bytes);
    let delimiter = detect_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut header: Option<HeaderMap> = None;
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        if header.is_none() {
            if is_header_record(&record) {
                header = Some(HeaderMap::from_record(&record));
            }
            continue;
        }
        let Some(map) = header.as_ref() else {
            continue;
        };

        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let article = cell(&record, Some(map.article));
        if article.is_empty() {
            continue;
        }

        let skip: Vec<usize> = std::iter::once(map.article).chain(map.description).collect();
        let [tail_soh, tail_mpl, tail_capacity] = tail_trio(&record, &skip);

        rows.push(json!({
            "article": article,
            "description": cell(&record, map.description),
            "header_mpl": cell(&record, map.mpl.as_ref().map(|(i, _)| *i)),
            "header_soh": cell(&record, map.soh.as_ref().map(|(i, _)| *i)),
            "header_mpl_label": map.mpl.as_ref().map(|(_, l)| l.as_str()).unwrap_or(""),
            "header_soh_label": map.soh.as_ref().map(|(_, l)| l.as_str()).unwrap_or(""),
            "tail_soh": tail_soh,
            "tail_mpl": tail_mpl,
            "tail_capacity": tail_capacity,
            "raw_row": record.iter().collect::<Vec<_>>().join(" "),
        }));
    }

    Ok(json!({ "rows": rows }))
}

/// Разделитель по первой непустой строке: `;`, таб или `,`
fn detect_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    [b';', b'\t', b',']
        .into_iter()
        .max_by_key(|d| first.matches(*d as char).count())
        .filter(|d| first.contains(*d as char))
        .unwrap_or(b',')
}

#[async_trait]
impl ExtractionProvider for CsvTableProvider {
    async fn extract(
        &self,
        staged: &StagedDocument,
        _request: &ExtractionRequest,
    ) -> Result<Value, ExtractionError> {
        parse_csv(&staged.document.bytes)
    }

    fn provider_name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::extraction::response_shape::candidate_rows;

    const REPORT: &str = "\
Store 42 stock report,,,,,
Article,Description,Dept,SOH,MPL,Capacity
12345,PI Widget,7,4,10,20
22222,WW  Bolt   7mm,7,\"1,200\",1500,3000
,Total,,,,
33333,BW Hose Clamp,7,,6,12
";

    #[test]
    fn test_header_row_is_located() {
        let value = parse_csv(REPORT.as_bytes()).unwrap();
        let rows = candidate_rows(&value);
        assert_eq!(rows.len(), 3);

        let first = &rows[0];
        assert_eq!(first.article, "12345");
        assert_eq!(first.description, "PI Widget");
        assert_eq!(first.header_mpl_label, "MPL");
        assert_eq!(first.header_soh_label, "SOH");
        assert_eq!(first.header_mpl, json!("10"));
        assert_eq!(first.header_soh, json!("4"));
        assert_eq!(
            (&first.tail_soh, &first.tail_mpl, &first.tail_capacity),
            (&json!(4), &json!(10), &json!(20))
        );
    }

    #[test]
    fn test_thousands_separators_and_blank_cells() {
        let value = parse_csv(REPORT.as_bytes()).unwrap();
        let rows = candidate_rows(&value);
        assert_eq!(rows[1].header_soh, json!("1,200"));
        assert_eq!(rows[1].tail_soh, json!(1200));

        // Пустая ячейка не числовая: в тройку попадает соседняя колонка
        assert_eq!(rows[2].header_soh, json!(""));
        assert_eq!(
            (&rows[2].tail_soh, &rows[2].tail_mpl, &rows[2].tail_capacity),
            (&json!(7), &json!(6), &json!(12))
        );
    }

    #[test]
    fn test_tail_trio_reads_rightmost_numbers() {
        let record = csv::StringRecord::from(vec!["12345", "Widget 7", "3", "4", "n/a", "10", "20"]);
        assert_eq!(tail_trio(&record, &[0, 1]), [4, 10, 20]);

        // Меньше трёх чисел: недостающие слева остаются нулями
        let record = csv::StringRecord::from(vec!["12345", "Widget", "", "6"]);
        assert_eq!(tail_trio(&record, &[0, 1]), [0, 0, 6]);

        // Артикул и описание в тройку не попадают, даже если похожи на числа
        let record = csv::StringRecord::from(vec!["777", "888", "5"]);
        assert_eq!(tail_trio(&record, &[0, 1]), [0, 0, 5]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "Item;Desc;SOH;MPL;Cap\nA1;Thing;1;2;3\n";
        let rows = candidate_rows(&parse_csv(csv.as_bytes()).unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].article, "A1");
        assert_eq!(rows[0].description, "Thing");
    }

    #[test]
    fn test_no_header_yields_empty_rows() {
        let rows = candidate_rows(&parse_csv(b"a,b,c\n1,2,3\n").unwrap());
        assert!(rows.is_empty());
    }
}
