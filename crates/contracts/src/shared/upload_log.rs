use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Статус обработки загрузки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Ok,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Ok => "ok",
            UploadStatus::Failed => "failed",
        }
    }
}

/// Запись аудита загрузки. Только метаданные и счётчики, без содержимого строк.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLogEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub filename: String,
    pub file_size: u64,
    pub document_kind: Option<String>,
    pub provider: Option<String>,
    pub page_count: Option<u32>,
    pub page_limit: Option<u32>,
    pub candidate_rows: u32,
    pub result_rows: u32,
    pub client_ip: Option<String>,
    pub status: UploadStatus,
    pub error: Option<String>,
}

impl UploadLogEntry {
    pub fn new(filename: impl Into<String>, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            filename: filename.into(),
            file_size,
            document_kind: None,
            provider: None,
            page_count: None,
            page_limit: None,
            candidate_rows: 0,
            result_rows: 0,
            client_ip: None,
            status: UploadStatus::Ok,
            error: None,
        }
    }
}
