//! Приведение разных форматов ответа провайдеров к одному набору строк-кандидатов.
//!
//! Поддерживаемые формы:
//! - уже разобранный документ `{ "rows": [...] }` или массив строк;
//! - `output_text` (Responses API);
//! - `output[].content[].text` (Responses API, вложенный массив);
//! - `choices[0].message.content` (Chat Completions);
//! - `candidates[0].content.parts[].text` (Gemini-подобные API);
//! - поле `text`.
//!
//! Некорректный или пустой ответ даёт пустой набор строк, а не ошибку.

use serde_json::Value;

use crate::domain::a001_stock_report::CandidateRow;

/// Достать JSON-документ с результатом из тела ответа провайдера
pub fn extract_payload(body: &Value) -> Option<Value> {
    if body.get("rows").is_some() || body.is_array() {
        return Some(body.clone());
    }

    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        return parse_model_text(text);
    }

    if let Some(output) = body.get("output").and_then(Value::as_array) {
        let text = output
            .iter()
            .filter_map(|item| item.get("content").and_then(Value::as_array))
            .flatten()
            .filter(|part| {
                part.get("type")
                    .and_then(Value::as_str)
                    .map_or(true, |t| t == "output_text" || t == "text")
            })
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return parse_model_text(&text);
        }
    }

    if let Some(content) = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        return parse_model_text(content);
    }

    if let Some(parts) = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
    {
        let text = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("");
        return parse_model_text(&text);
    }

    if let Some(text) = body.get("text").and_then(Value::as_str) {
        return parse_model_text(text);
    }

    None
}

/// Разобрать текст модели: убрать markdown-ограждения и лишний текст вокруг JSON
pub fn parse_model_text(text: &str) -> Option<Value> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let json_str = extract_json_object(trimmed)?;
    serde_json::from_str(json_str).ok()
}

/// Внешний JSON-объект из строки с окружающим текстом (например, рассуждения модели)
fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&s[start..=end])
}

/// Строки-кандидаты из разобранного документа. Невалидные элементы пропускаются.
pub fn candidate_rows(payload: &Value) -> Vec<CandidateRow> {
    let items = match payload {
        Value::Array(items) => items.as_slice(),
        other => match other.get("rows").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => return Vec::new(),
        },
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<CandidateRow>(item.clone()) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed candidate row");
                None
            }
        })
        .collect()
}

/// Полное приведение ответа провайдера к строкам-кандидатам
pub fn normalize_response(provider: &str, body: &Value) -> Vec<CandidateRow> {
    match extract_payload(body) {
        Some(payload) => candidate_rows(&payload),
        None => {
            tracing::warn!(provider, "Provider response has no parseable rows payload");
            Vec::new()
        }
    }
}
