use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::usecases::u501_extract_stock_report::ExtractExecutor;
use crate::{handlers, system};

/// Запас сверх лимита файла на заголовки и остальные поля multipart
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<ExtractExecutor>,
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Конфигурация всех роутов приложения
///
/// Всё, что не попало в API, отдаётся из `static_dir`; неизвестные пути
/// (например `/labels`) получают `index.html`.
pub fn configure_routes(state: AppState, static_dir: &str) -> Router {
    let body_limit = state
        .executor
        .settings()
        .max_bytes
        .saturating_add(MULTIPART_OVERHEAD);
    let index = format!("{}/index.html", static_dir.trim_end_matches('/'));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // USECASES
        // ========================================
        // U501 Extract stock report
        .route(
            "/api/u501/extract",
            post(handlers::usecases::u501_extract)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir).not_found_service(ServeFile::new(index)))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors())
}
