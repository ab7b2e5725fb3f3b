use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::usecases::u501_extract_stock_report::ErrorResponse;
use thiserror::Error;

use crate::shared::extraction::ExtractionError;

/// Ошибки загрузки и извлечения отчёта
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Input(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// `size` неизвестен, если тело запроса оборвано лимитом multipart
    #[error("File is too large: {} (limit {limit} bytes)", describe_size(.size))]
    PayloadTooLarge { size: Option<usize>, limit: usize },

    #[error("Extraction provider error: {0}")]
    ProviderTransport(String),

    #[error("Extraction provider did not answer within {secs} s")]
    ProviderTimeout { secs: u64 },

    #[error("Extraction provider is not enabled: {0}")]
    ProviderNotEnabled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn describe_size(size: &Option<usize>) -> String {
    match size {
        Some(size) => format!("{size} bytes"),
        None => "request body exceeds the upload limit".to_string(),
    }
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Input(_) | UploadError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            UploadError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::ProviderTransport(_) => StatusCode::BAD_GATEWAY,
            UploadError::ProviderTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            UploadError::ProviderNotEnabled(_) => StatusCode::NOT_IMPLEMENTED,
            UploadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractionError> for UploadError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::NotEnabled(reason) => UploadError::ProviderNotEnabled(reason),
            other => UploadError::ProviderTransport(other.to_string()),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Upload failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Upload rejected");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
