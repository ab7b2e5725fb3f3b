pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::routes::AppState;
use crate::shared::extraction::ProviderRegistry;
use crate::usecases::u501_extract_stock_report::{ExtractExecutor, ExtractSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    // Аудит загрузок необязателен: без базы сервер продолжает работать
    let db_path = shared::config::get_database_path(&config)?;
    if let Err(e) = shared::data::db::initialize_database(Some(&db_path.to_string_lossy())).await {
        tracing::warn!("Upload log database is unavailable: {e}");
    }

    let registry = ProviderRegistry::from_config(&config.extraction)
        .map_err(|e| anyhow::anyhow!("extraction providers init failed: {e}"))?;
    let executor = ExtractExecutor::new(registry, ExtractSettings::from_config(&config));
    let state = AppState {
        executor: Arc::new(executor),
    };

    let app = routes::configure_routes(state, &config.server.static_dir);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server address: {e}"))?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
