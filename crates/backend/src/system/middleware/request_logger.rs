use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Middleware для логирования HTTP запросов
///
/// Пишет в лог длительность, размер ответа, статус, метод и путь.
/// Тело ответа вычитывается, чтобы узнать реальный размер.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                status = parts.status.as_u16(),
                %method,
                %path,
                elapsed_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "Response body could not be read"
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let size = format_number(bytes.len());
    if parts.status.is_success() {
        tracing::info!(status = parts.status.as_u16(), %method, %path, elapsed_ms, %size, "HTTP");
    } else {
        tracing::warn!(status = parts.status.as_u16(), %method, %path, elapsed_ms, %size, "HTTP");
    }

    Response::from_parts(parts, Body::from(bytes))
}
