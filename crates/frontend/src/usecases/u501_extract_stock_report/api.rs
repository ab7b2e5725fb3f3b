use std::fmt;

use contracts::usecases::u501_extract_stock_report::{
    ErrorResponse, ResultRow, UploadResponse, FILE_FIELD, PAGE_LIMIT_FIELD,
};
use futures::future::{select, Either};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

use crate::shared::api_utils::api_url;

/// Сколько клиент ждёт ответа. Чуть больше серверного таймаута, чтобы
/// серверная ошибка 504 успела дойти до пользователя.
const CLIENT_TIMEOUT_MS: u32 = 120_000;

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Клиент перестал ждать; запрос на сервере не отменяется
    Timeout,
    Server { status: u16, message: String },
    Network(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Timeout => write!(
                f,
                "The report is taking too long. Try a smaller page limit or upload again."
            ),
            ExtractError::Server { status: 504, message } => write!(
                f,
                "{message}. Try a smaller page limit or upload again."
            ),
            ExtractError::Server { status, message } => write!(f, "HTTP {status}: {message}"),
            ExtractError::Network(message) => write!(f, "Network error: {message}"),
        }
    }
}

async fn read_text(resp: &Response) -> Result<String, ExtractError> {
    let promise = resp
        .text()
        .map_err(|e| ExtractError::Network(format!("{e:?}")))?;
    let text = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| ExtractError::Network(format!("{e:?}")))?;
    Ok(text.as_string().unwrap_or_default())
}

async fn send(file: web_sys::File, page_limit: Option<u32>) -> Result<UploadResponse, ExtractError> {
    let network = |e: wasm_bindgen::JsValue| ExtractError::Network(format!("{e:?}"));

    let form_data = FormData::new().map_err(network)?;
    form_data
        .append_with_blob_and_filename(FILE_FIELD, &file, &file.name())
        .map_err(network)?;
    if let Some(pages) = page_limit {
        form_data
            .append_with_str(PAGE_LIMIT_FIELD, &pages.to_string())
            .map_err(network)?;
    }

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form_data);

    let request =
        Request::new_with_str_and_init(&api_url("/api/u501/extract"), &opts).map_err(network)?;

    let window = web_sys::window().ok_or_else(|| ExtractError::Network("no window".into()))?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?;
    let resp: Response = resp_value.dyn_into().map_err(network)?;

    let text = read_text(&resp).await?;
    if !resp.ok() {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or_else(|_| resp.status_text());
        return Err(ExtractError::Server {
            status: resp.status(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| ExtractError::Network(format!("bad response: {e}")))
}

/// Загрузить отчёт и получить отфильтрованные строки.
/// Запрос соревнуется с таймером; при таймауте сервер продолжает обработку.
pub async fn extract(
    file: web_sys::File,
    page_limit: Option<u32>,
) -> Result<Vec<ResultRow>, ExtractError> {
    let request = Box::pin(send(file, page_limit));
    let timer = Box::pin(TimeoutFuture::new(CLIENT_TIMEOUT_MS));

    match select(request, timer).await {
        Either::Left((result, _)) => result.map(|response| response.rows),
        Either::Right(((), _)) => Err(ExtractError::Timeout),
    }
}
