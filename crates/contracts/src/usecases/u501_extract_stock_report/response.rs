use serde::{Deserialize, Serialize};

/// Ключ localStorage, под которым клиент хранит последний набор строк
pub const RESULT_ROWS_STORAGE_KEY: &str = "u501_result_rows";

/// Строка результата: всегда `soh <= mpl` и непустой артикул
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub article: String,
    pub description: String,
    pub mpl: u32,
    pub soh: u32,
}

/// Успешный ответ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    pub rows: Vec<ResultRow>,
}

/// Тело ответа с ошибкой (любой non-2xx)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
