use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

use crate::shared::config::DEFAULT_DATABASE_PATH;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// URL подключения к SQLite; на Windows путь приводится к виду `/C:/...`
fn sqlite_url(db_file: &str) -> anyhow::Result<String> {
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

const CREATE_UPLOAD_LOG_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS a002_upload_log (
        id TEXT PRIMARY KEY NOT NULL,
        created_at TEXT NOT NULL,
        filename TEXT NOT NULL,
        file_size INTEGER NOT NULL,
        document_kind TEXT,
        provider TEXT,
        page_count INTEGER,
        page_limit INTEGER,
        candidate_rows INTEGER NOT NULL DEFAULT 0,
        result_rows INTEGER NOT NULL DEFAULT 0,
        client_ip TEXT,
        status TEXT NOT NULL,
        error TEXT
    );
"#;

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or(DEFAULT_DATABASE_PATH);
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Database::connect(&sqlite_url(db_file)?).await?;

    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        CREATE_UPLOAD_LOG_TABLE.to_string(),
    ))
    .await?;
    tracing::info!("Table a002_upload_log is ready");

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Подключение к базе, если она была инициализирована
pub fn get_connection() -> Option<&'static DatabaseConnection> {
    DB_CONN.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_for_absolute_path() {
        assert_eq!(
            sqlite_url("/var/lib/app/app.db").unwrap(),
            "sqlite:///var/lib/app/app.db?mode=rwc"
        );
    }

    #[test]
    fn test_sqlite_url_for_relative_path() {
        let url = sqlite_url("target/db/app.db").unwrap();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("target/db/app.db?mode=rwc"));
    }
}
