use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::csv_provider::CsvTableProvider;
use super::openai_provider::OpenAiProvider;
use super::parser_service_provider::ParserServiceProvider;
use super::types::{
    DocumentKind, ExtractionError, ExtractionProvider, ExtractionRequest, SourceDocument,
    StagedDocument,
};
use crate::shared::config::{ExtractionConfig, ProviderKind};

/// Заглушка для выключенного или не настроенного провайдера
pub struct NotEnabledProvider {
    reason: String,
}

impl NotEnabledProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ExtractionProvider for NotEnabledProvider {
    async fn stage(&self, _document: SourceDocument) -> Result<StagedDocument, ExtractionError> {
        Err(ExtractionError::NotEnabled(self.reason.clone()))
    }

    async fn extract(
        &self,
        _staged: &StagedDocument,
        _request: &ExtractionRequest,
    ) -> Result<Value, ExtractionError> {
        Err(ExtractionError::NotEnabled(self.reason.clone()))
    }

    fn provider_name(&self) -> &str {
        "disabled"
    }
}

/// Сопоставление типа документа и провайдера извлечения
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<DocumentKind, Arc<dyn ExtractionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, kind: DocumentKind, provider: Arc<dyn ExtractionProvider>) -> Self {
        self.providers.insert(kind, provider);
        self
    }

    /// Сборка реестра из конфигурации. Отсутствие ключа или адреса сервиса
    /// не мешает запуску: такой провайдер отвечает "not enabled".
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let openai: Arc<dyn ExtractionProvider> = match config.openai.resolved_api_key() {
            Some(key) => Arc::new(OpenAiProvider::new(
                &config.openai.api_base,
                key,
                config.openai.model.clone(),
            )?),
            None => {
                tracing::warn!("OPENAI_API_KEY is not set, OpenAI extraction is disabled");
                Arc::new(NotEnabledProvider::new("OpenAI API key is not configured"))
            }
        };

        let parser_service = ParserServiceProvider::new(config.parser_service.url.clone())?;
        let parser_service: Arc<dyn ExtractionProvider> = if parser_service.is_enabled() {
            Arc::new(parser_service)
        } else {
            Arc::new(NotEnabledProvider::new("parser service url is not configured"))
        };

        let csv: Arc<dyn ExtractionProvider> = Arc::new(CsvTableProvider);

        let mut registry = Self::new();
        for kind in [DocumentKind::Pdf, DocumentKind::Csv, DocumentKind::Xlsx] {
            let provider = match config.provider_for(kind) {
                ProviderKind::Openai => openai.clone(),
                ProviderKind::Csv if kind == DocumentKind::Csv => csv.clone(),
                ProviderKind::Csv => Arc::new(NotEnabledProvider::new(format!(
                    "csv provider cannot read {} documents",
                    kind.as_str()
                ))),
                ProviderKind::ParserService => parser_service.clone(),
                ProviderKind::Disabled => Arc::new(NotEnabledProvider::new(format!(
                    "{} extraction is disabled",
                    kind.as_str()
                ))),
            };
            tracing::info!(
                document_kind = kind.as_str(),
                provider = provider.provider_name(),
                "Extraction provider registered"
            );
            registry.providers.insert(kind, provider);
        }

        Ok(registry)
    }

    pub fn get(&self, kind: DocumentKind) -> Arc<dyn ExtractionProvider> {
        self.providers.get(&kind).cloned().unwrap_or_else(|| {
            Arc::new(NotEnabledProvider::new(format!(
                "no provider for {} documents",
                kind.as_str()
            )))
        })
    }
}
