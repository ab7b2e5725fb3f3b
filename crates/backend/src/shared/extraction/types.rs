use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Ошибки провайдера извлечения
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Provider API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider not enabled: {0}")]
    NotEnabled(String),
}

impl From<reqwest::Error> for ExtractionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ExtractionError::MalformedResponse(e.to_string())
        } else {
            ExtractionError::Transport(e.to_string())
        }
    }
}

/// Тип входного документа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Csv,
    Xlsx,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Csv => "csv",
            DocumentKind::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Csv => "text/csv",
            DocumentKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Определение типа: сигнатура файла → расширение → заявленный content-type
    pub fn detect(filename: &str, content_type: Option<&str>, bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            return Some(DocumentKind::Pdf);
        }

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => return Some(DocumentKind::Pdf),
            Some("csv") | Some("txt") => return Some(DocumentKind::Csv),
            Some("xlsx") => return Some(DocumentKind::Xlsx),
            None if bytes.starts_with(b"PK\x03\x04") => return Some(DocumentKind::Xlsx),
            _ => {}
        }

        match content_type.map(|ct| ct.split(';').next().unwrap_or("").trim()) {
            Some("application/pdf") => Some(DocumentKind::Pdf),
            Some("text/csv") | Some("application/csv") => Some(DocumentKind::Csv),
            Some(ct) if ct == DocumentKind::Xlsx.mime_type() => Some(DocumentKind::Xlsx),
            _ => None,
        }
    }
}

/// Исходный документ, загруженный клиентом
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

/// Документ, размещённый во временном хранилище провайдера
#[derive(Debug, Clone)]
pub struct StagedDocument {
    pub document: SourceDocument,
    /// Идентификатор временной загрузки на стороне провайдера (если есть)
    pub handle: Option<String>,
}

impl StagedDocument {
    pub fn local(document: SourceDocument) -> Self {
        Self {
            document,
            handle: None,
        }
    }
}

/// Запрос на извлечение: схема результата + инструкции
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub schema: Value,
    pub instructions: String,
    pub page_limit: Option<u32>,
}

/// Провайдер извлечения строк таблицы из документа.
///
/// Жизненный цикл: `stage` → `extract` → `release`. Оркестратор вызывает
/// `release` при любом исходе `extract`, включая таймаут.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Разместить документ у провайдера
    async fn stage(&self, document: SourceDocument) -> Result<StagedDocument, ExtractionError> {
        Ok(StagedDocument::local(document))
    }

    /// Извлечь строки. Возвращает JSON-документ вида `{ "rows": [...] }`
    /// в любом из поддерживаемых форматов ответа.
    async fn extract(
        &self,
        staged: &StagedDocument,
        request: &ExtractionRequest,
    ) -> Result<Value, ExtractionError>;

    /// Удалить временную загрузку
    async fn release(&self, _staged: StagedDocument) -> Result<(), ExtractionError> {
        Ok(())
    }

    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_magic_bytes() {
        assert_eq!(
            DocumentKind::detect("report.bin", None, b"%PDF-1.7 ..."),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect("report", None, b"PK\x03\x04rest"),
            Some(DocumentKind::Xlsx)
        );
    }

    #[test]
    fn test_detect_by_extension_and_content_type() {
        assert_eq!(
            DocumentKind::detect("Stock.CSV", None, b"a,b"),
            Some(DocumentKind::Csv)
        );
        assert_eq!(
            DocumentKind::detect("upload", Some("text/csv; charset=utf-8"), b"a,b"),
            Some(DocumentKind::Csv)
        );
        assert_eq!(DocumentKind::detect("notes.docx", None, b"PK\x03\x04"), None);
    }
}
