use contracts::shared::upload_log::UploadLogEntry;

use super::repository;
use crate::shared::data::db::get_connection;

/// Записать аудит загрузки в фоне. Ошибки записи только логируются.
pub fn record(entry: UploadLogEntry) {
    let Some(conn) = get_connection() else {
        tracing::warn!(upload_id = %entry.id, "Database is not available, upload log entry dropped");
        return;
    };

    tokio::spawn(async move {
        if let Err(e) = repository::insert(conn, &entry).await {
            tracing::warn!(upload_id = %entry.id, error = %e, "Failed to write upload log entry");
        }
    });
}
