//! Последний набор строк результата в localStorage.
//!
//! Пишет только страница загрузки, читают таблица и страница этикеток
//! (в другой вкладке). Отсутствие или порча данных означает "данных ещё нет".

use contracts::usecases::u501_extract_stock_report::{ResultRow, RESULT_ROWS_STORAGE_KEY};

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn encode_rows(rows: &[ResultRow]) -> Option<String> {
    serde_json::to_string(rows).ok()
}

pub fn decode_rows(raw: Option<&str>) -> Vec<ResultRow> {
    raw.and_then(|json| serde_json::from_str::<Vec<ResultRow>>(json).ok())
        .unwrap_or_default()
}

pub fn save_rows(rows: &[ResultRow]) {
    let (Some(storage), Some(json)) = (storage(), encode_rows(rows)) else {
        log::warn!("Result rows were not saved: localStorage is unavailable");
        return;
    };
    if let Err(e) = storage.set_item(RESULT_ROWS_STORAGE_KEY, &json) {
        log::warn!("Failed to save result rows: {:?}", e);
    }
}

pub fn load_rows() -> Vec<ResultRow> {
    let raw = storage().and_then(|s| s.get_item(RESULT_ROWS_STORAGE_KEY).ok().flatten());
    decode_rows(raw.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_corrupt_data_is_empty() {
        assert!(decode_rows(None).is_empty());
        assert!(decode_rows(Some("")).is_empty());
        assert!(decode_rows(Some("{\"rows\":1}")).is_empty());
    }

    #[test]
    fn test_rows_survive_storage_encoding() {
        let rows = vec![ResultRow {
            article: "12345".into(),
            description: "Widget".into(),
            mpl: 10,
            soh: 4,
        }];
        let json = encode_rows(&rows).unwrap();
        assert_eq!(decode_rows(Some(&json)), rows);
    }
}
