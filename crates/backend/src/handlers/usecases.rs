use std::net::SocketAddr;

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{ConnectInfo, Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::usecases::u501_extract_stock_report::{UploadResponse, FILE_FIELD, PAGE_LIMIT_FIELD};

use crate::routes::AppState;
use crate::usecases::u501_extract_stock_report::{UploadError, UploadedFile};

// ============================================================================
// UseCase u501: Extract stock report
// ============================================================================

/// Поля multipart-формы после разбора
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    page_limit: Option<u32>,
}

fn multipart_error(e: MultipartError, limit: usize) -> UploadError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::PayloadTooLarge { size: None, limit }
    } else {
        UploadError::Input(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn rejection_error(rejection: MultipartRejection) -> UploadError {
    UploadError::Input(format!(
        "Expected a multipart/form-data body with a `{FILE_FIELD}` field: {}",
        rejection.body_text()
    ))
}

fn parse_page_limit(text: &str) -> Result<Option<u32>, UploadError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<u32>()
        .map(|n| (n > 0).then_some(n))
        .map_err(|_| UploadError::Input(format!("{PAGE_LIMIT_FIELD} must be a positive integer")))
}

async fn read_form(mut multipart: Multipart, limit: usize) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                let filename = field
                    .file_name()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or("upload")
                    .to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            PAGE_LIMIT_FIELD => {
                let text = field.text().await.map_err(|e| multipart_error(e, limit))?;
                form.page_limit = parse_page_limit(&text)?;
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

/// POST /api/u501/extract
///
/// Все отказы, включая тело не в формате multipart, отвечают JSON `{ "error": ... }`
/// и попадают в аудит загрузок.
pub async fn u501_extract(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let client_ip = connect_info.map(|ConnectInfo(addr)| addr.ip().to_string());
    let executor = &state.executor;
    let limit = executor.settings().max_bytes;

    let form = match multipart {
        Ok(multipart) => read_form(multipart, limit).await,
        Err(rejection) => Err(rejection_error(rejection)),
    };
    let form = match form {
        Ok(form) => form,
        Err(e) => return Err(executor.reject(None, e, client_ip)),
    };
    let Some(file) = form.file else {
        let error = UploadError::Input("No file uploaded".into());
        return Err(executor.reject(None, error, client_ip));
    };

    let response = executor.execute(file, form.page_limit, client_ip).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_limit() {
        assert_eq!(parse_page_limit("").unwrap(), None);
        assert_eq!(parse_page_limit(" 3 ").unwrap(), Some(3));
        assert_eq!(parse_page_limit("0").unwrap(), None);
        assert!(parse_page_limit("-1").is_err());
        assert!(parse_page_limit("abc").is_err());
    }
}
