//! Адрес backend для запросов API

/// Порт backend-сервера
const BACKEND_PORT: &str = "3000";

/// Базовый URL API.
///
/// Страница, отданная самим backend, ходит на свой origin (пустой префикс).
/// Под dev-сервером trunk запросы уходят на тот же хост, но на порт backend.
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let location = window.location();

    let port = location.port().unwrap_or_default();
    if port == BACKEND_PORT {
        return String::new();
    }

    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{protocol}//{hostname}:{BACKEND_PORT}")
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
