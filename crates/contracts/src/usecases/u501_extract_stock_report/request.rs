//! Поля multipart-запроса `POST /api/u501/extract`

/// Файл отчёта (PDF/CSV/XLSX)
pub const FILE_FIELD: &str = "file";

/// Необязательное ограничение количества страниц
pub const PAGE_LIMIT_FIELD: &str = "page_limit";
