use std::sync::Arc;
use std::time::Duration;

use contracts::shared::upload_log::{UploadLogEntry, UploadStatus};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_extract_stock_report::{ExtractStockReport, UploadResponse};
use serde_json::Value;
use tokio::time::Instant;
use tracing::Instrument;

use super::error::UploadError;
use super::page_count::{effective_page_limit, pdf_page_count};
use crate::domain::a001_stock_report::service;
use crate::domain::a002_upload_log;
use crate::shared::config::Config;
use crate::shared::extraction::response_shape::normalize_response;
use crate::shared::extraction::schema::{build_instructions, candidate_rows_schema};
use crate::shared::extraction::types::{ExtractionRequest, StagedDocument};
use crate::shared::extraction::{
    DocumentKind, ExtractionProvider, ProviderRegistry, SourceDocument,
};
use crate::shared::format::format_bytes;

/// Файл, полученный из multipart-запроса
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub max_bytes: usize,
    pub max_page_limit: u32,
    pub timeout: Duration,
}

impl ExtractSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_bytes: config.upload.max_bytes,
            max_page_limit: config.upload.max_page_limit,
            timeout: Duration::from_secs(config.extraction.timeout_secs.max(1)),
        }
    }
}

/// Executor для UseCase извлечения отчёта о низких остатках
#[derive(Clone)]
pub struct ExtractExecutor {
    registry: ProviderRegistry,
    settings: ExtractSettings,
}

impl ExtractExecutor {
    pub fn new(registry: ProviderRegistry, settings: ExtractSettings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> &ExtractSettings {
        &self.settings
    }

    /// Обработать загруженный файл. Аудит пишется при любом исходе.
    pub async fn execute(
        &self,
        file: UploadedFile,
        requested_pages: Option<u32>,
        client_ip: Option<String>,
    ) -> Result<UploadResponse, UploadError> {
        let mut entry = UploadLogEntry::new(file.filename.clone(), file.bytes.len() as u64);
        entry.client_ip = client_ip;

        let span = tracing::info_span!(
            "extract",
            usecase = %ExtractStockReport::full_name(),
            upload_id = %entry.id,
            filename = %file.filename
        );
        let result = self
            .run(file, requested_pages, &mut entry)
            .instrument(span)
            .await;

        match &result {
            Ok(response) => entry.result_rows = response.rows.len() as u32,
            Err(e) => mark_failed(&mut entry, e),
        }
        a002_upload_log::service::record(entry);

        result
    }

    /// Отказ до разбора файла (нет поля file, тело не multipart, превышен
    /// лимит тела запроса). Запись аудита создаётся так же, как для `execute`.
    pub fn reject(
        &self,
        filename: Option<&str>,
        error: UploadError,
        client_ip: Option<String>,
    ) -> UploadError {
        a002_upload_log::service::record(rejected_entry(filename, &error, client_ip));
        error
    }

    async fn run(
        &self,
        file: UploadedFile,
        requested_pages: Option<u32>,
        entry: &mut UploadLogEntry,
    ) -> Result<UploadResponse, UploadError> {
        let size = file.bytes.len();
        if size == 0 {
            return Err(UploadError::Input("Uploaded file is empty".into()));
        }
        if size > self.settings.max_bytes {
            return Err(UploadError::PayloadTooLarge {
                size: Some(size),
                limit: self.settings.max_bytes,
            });
        }

        let kind = DocumentKind::detect(&file.filename, file.content_type.as_deref(), &file.bytes)
            .ok_or_else(|| UploadError::UnsupportedFormat(file.filename.clone()))?;
        entry.document_kind = Some(kind.as_str().to_string());

        let page_count = match kind {
            DocumentKind::Pdf => pdf_page_count(&file.bytes),
            _ => None,
        };
        let page_limit =
            effective_page_limit(requested_pages, page_count, self.settings.max_page_limit);
        entry.page_count = page_count;
        entry.page_limit = page_limit;

        let provider = self.registry.get(kind);
        let provider_name = provider.provider_name().to_string();
        entry.provider = Some(provider_name.clone());

        tracing::info!(
            document_kind = kind.as_str(),
            provider = %provider_name,
            size = %format_bytes(size),
            page_count = ?page_count,
            page_limit = ?page_limit,
            "Extraction started"
        );

        let request = ExtractionRequest {
            schema: candidate_rows_schema(),
            instructions: build_instructions(page_limit),
            page_limit,
        };
        let document = SourceDocument {
            filename: file.filename,
            kind,
            bytes: file.bytes,
        };

        let body = self.call_provider(provider, document, &request).await?;

        let candidates = normalize_response(&provider_name, &body);
        entry.candidate_rows = candidates.len() as u32;

        let (rows, stats) = service::process(&candidates);
        tracing::info!(
            candidates = stats.candidates,
            from_header = stats.from_header,
            from_tail = stats.from_tail,
            from_raw_row = stats.from_raw_row,
            kept = stats.kept,
            "Extraction finished"
        );

        Ok(UploadResponse { rows })
    }

    /// stage → extract под общим дедлайном. Временная загрузка удаляется в
    /// фоне при любом исходе extract.
    async fn call_provider(
        &self,
        provider: Arc<dyn ExtractionProvider>,
        document: SourceDocument,
        request: &ExtractionRequest,
    ) -> Result<Value, UploadError> {
        let secs = self.settings.timeout.as_secs();
        let deadline = Instant::now() + self.settings.timeout;

        let staged = tokio::time::timeout_at(deadline, provider.stage(document))
            .await
            .map_err(|_| UploadError::ProviderTimeout { secs })??;

        let outcome = tokio::time::timeout_at(deadline, provider.extract(&staged, request)).await;
        spawn_release(provider, staged);

        match outcome {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::warn!(timeout_secs = secs, "Extraction provider timed out");
                Err(UploadError::ProviderTimeout { secs })
            }
        }
    }
}

fn mark_failed(entry: &mut UploadLogEntry, error: &UploadError) {
    entry.status = UploadStatus::Failed;
    entry.error = Some(error.to_string());
}

fn rejected_entry(
    filename: Option<&str>,
    error: &UploadError,
    client_ip: Option<String>,
) -> UploadLogEntry {
    let mut entry = UploadLogEntry::new(filename.unwrap_or_default(), 0);
    entry.client_ip = client_ip;
    mark_failed(&mut entry, error);
    entry
}

/// Удаление временной загрузки не влияет на ответ клиенту
fn spawn_release(provider: Arc<dyn ExtractionProvider>, staged: StagedDocument) {
    tokio::spawn(
        async move {
            if let Err(e) = provider.release(staged).await {
                tracing::warn!(
                    provider = provider.provider_name(),
                    error = %e,
                    "Failed to release transient provider upload"
                );
            }
        }
        .in_current_span(),
    );
}
