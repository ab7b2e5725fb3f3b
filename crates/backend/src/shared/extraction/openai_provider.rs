use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::schema::SCHEMA_NAME;
use super::types::{
    ExtractionError, ExtractionProvider, ExtractionRequest, SourceDocument, StagedDocument,
};

/// OpenAI провайдер: документ загружается в Files API, извлечение идёт через
/// Responses API со строгой JSON-схемой, после чего файл удаляется.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_base: &str, api_key: String, model: String) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    /// GPT-5 и o-серия не принимают кастомный temperature
    fn supports_temperature(model_id: &str) -> bool {
        let is_restricted = model_id.starts_with("gpt-5")
            || model_id.starts_with("o1")
            || model_id.starts_with("o3")
            || model_id.starts_with("o4");

        !is_restricted
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// Тело запроса к Responses API
    fn build_request_body(&self, file_id: &str, request: &ExtractionRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "input": [{
                "role": "user",
                "content": [
                    { "type": "input_file", "file_id": file_id },
                    { "type": "input_text", "text": request.instructions },
                ]
            }],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": SCHEMA_NAME,
                    "schema": request.schema,
                    "strict": true,
                }
            }
        });

        if Self::supports_temperature(&self.model) {
            body["temperature"] = json!(0);
        }

        body
    }

    /// Проверка статуса и разбор JSON-тела
    async fn read_json(response: reqwest::Response) -> Result<Value, ExtractionError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ExtractionError::MalformedResponse(format!("{e}: {}", truncate(&body, 200)))
        })
    }
}

/// Классификация HTTP-ошибок провайдера
fn classify_status(status: StatusCode, body: String) -> ExtractionError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ExtractionError::Auth(truncate(&body, 500))
        }
        StatusCode::TOO_MANY_REQUESTS => ExtractionError::RateLimited,
        _ => ExtractionError::Api {
            status: status.as_u16(),
            body: truncate(&body, 500),
        },
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[async_trait]
impl ExtractionProvider for OpenAiProvider {
    async fn stage(&self, document: SourceDocument) -> Result<StagedDocument, ExtractionError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.filename.clone())
            .mime_str(document.kind.mime_type())?;
        let form = Form::new().text("purpose", "user_data").part("file", part);

        let response = self
            .client
            .post(self.url("files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let body = Self::read_json(response).await?;

        let file_id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ExtractionError::MalformedResponse("file upload returned no id".into()))?
            .to_string();

        tracing::info!(file_id = %file_id, filename = %document.filename, "Document uploaded to OpenAI");

        Ok(StagedDocument {
            document,
            handle: Some(file_id),
        })
    }

    async fn extract(
        &self,
        staged: &StagedDocument,
        request: &ExtractionRequest,
    ) -> Result<Value, ExtractionError> {
        let file_id = staged.handle.as_deref().ok_or_else(|| {
            ExtractionError::Transport("document was not uploaded to the provider".into())
        })?;

        let response = self
            .client
            .post(self.url("responses"))
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(file_id, request))
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn release(&self, staged: StagedDocument) -> Result<(), ExtractionError> {
        let Some(file_id) = staged.handle else {
            return Ok(());
        };

        let response = self
            .client
            .delete(self.url(&format!("files/{file_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            tracing::debug!(file_id = %file_id, "Transient upload deleted");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_status(status, body))
        }
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
