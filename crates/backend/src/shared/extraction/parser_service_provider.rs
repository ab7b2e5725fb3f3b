//! Внешний сервис разбора таблиц (XLSX и др.). Сервис принимает документ
//! multipart-запросом и отвечает JSON-документом `{ "rows": [...] }`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::types::{ExtractionError, ExtractionProvider, ExtractionRequest, StagedDocument};

pub struct ParserServiceProvider {
    client: reqwest::Client,
    url: Option<String>,
}

impl ParserServiceProvider {
    pub fn new(url: Option<String>) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(Self { client, url })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    fn build_form(staged: &StagedDocument, request: &ExtractionRequest) -> Result<Form, ExtractionError> {
        let document = &staged.document;
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.filename.clone())
            .mime_str(document.kind.mime_type())?;

        let mut form = Form::new()
            .part("file", part)
            .text("document_kind", document.kind.as_str())
            .text("schema", request.schema.to_string());

        if let Some(pages) = request.page_limit {
            form = form.text("page_limit", pages.to_string());
        }

        Ok(form)
    }
}

#[async_trait]
impl ExtractionProvider for ParserServiceProvider {
    async fn extract(
        &self,
        staged: &StagedDocument,
        request: &ExtractionRequest,
    ) -> Result<Value, ExtractionError> {
        let Some(url) = self.url.as_deref() else {
            return Err(ExtractionError::NotEnabled(
                "parser service url is not configured".into(),
            ));
        };

        let form = Self::build_form(staged, request)?;
        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ExtractionError::MalformedResponse(format!("parser service: {e}")))
    }

    fn provider_name(&self) -> &str {
        "parser_service"
    }
}
