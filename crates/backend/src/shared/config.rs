use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::shared::extraction::types::DocumentKind;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub extraction: ExtractionConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Каталог собранного фронтенда
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            static_dir: "dist".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    /// Потолок размера загружаемого файла в байтах
    pub max_bytes: usize,
    pub max_page_limit: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 20 * 1024 * 1024,
            max_page_limit: 50,
        }
    }
}

/// Какой провайдер обрабатывает документ данного типа
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Openai,
    Csv,
    ParserService,
    Disabled,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractionConfig {
    pub timeout_secs: u64,
    pub pdf_provider: ProviderKind,
    pub csv_provider: ProviderKind,
    pub xlsx_provider: ProviderKind,
    pub openai: OpenAiConfig,
    pub parser_service: ParserServiceConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 90,
            pdf_provider: ProviderKind::Openai,
            csv_provider: ProviderKind::Csv,
            xlsx_provider: ProviderKind::ParserService,
            openai: OpenAiConfig::default(),
            parser_service: ParserServiceConfig::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn provider_for(&self, kind: DocumentKind) -> ProviderKind {
        match kind {
            DocumentKind::Pdf => self.pdf_provider,
            DocumentKind::Csv => self.csv_provider,
            DocumentKind::Xlsx => self.xlsx_provider,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".into(),
            model: "gpt-4.1-mini".into(),
            api_key: None,
        }
    }
}

impl OpenAiConfig {
    /// Ключ API: переменная окружения OPENAI_API_KEY важнее файла
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ParserServiceConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Путь к журналу загрузок по умолчанию, относительно каталога исполняемого файла
pub const DEFAULT_DATABASE_PATH: &str = "data/upload_log.db";

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.into(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
static_dir = "dist"

[upload]
max_bytes = 20971520
max_page_limit = 50

[extraction]
timeout_secs = 90
pdf_provider = "openai"
csv_provider = "csv"
xlsx_provider = "parser_service"

[extraction.openai]
api_base = "https://api.openai.com/v1"
model = "gpt-4.1-mini"

[extraction.parser_service]

[database]
path = "data/upload_log.db"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upload.max_bytes, 20 * 1024 * 1024);
        assert_eq!(config.extraction.timeout_secs, 90);
        assert_eq!(config.extraction.pdf_provider, ProviderKind::Openai);
        assert!(config.extraction.parser_service.url.is_none());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../../../../config.toml")).unwrap();
        assert_eq!(config.database.path, DatabaseConfig::default().path);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upload.max_bytes, UploadConfig::default().max_bytes);
        assert_eq!(config.extraction.pdf_provider, ProviderKind::Openai);

        let missing: Config = toml::from_str("[server]\nport = 3000\n").unwrap();
        assert_eq!(missing.database.path, DEFAULT_DATABASE_PATH);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [extraction]
            timeout_secs = 5
            xlsx_provider = "disabled"
            "#,
        )
        .unwrap();
        assert_eq!(config.extraction.timeout_secs, 5);
        assert_eq!(config.extraction.xlsx_provider, ProviderKind::Disabled);
        assert_eq!(config.extraction.csv_provider, ProviderKind::Csv);
        assert_eq!(config.upload.max_page_limit, 50);
        assert_eq!(config.server.static_dir, "dist");
    }

    #[test]
    fn test_provider_for_document_kind() {
        let extraction = ExtractionConfig::default();
        assert_eq!(extraction.provider_for(DocumentKind::Pdf), ProviderKind::Openai);
        assert_eq!(extraction.provider_for(DocumentKind::Csv), ProviderKind::Csv);
        assert_eq!(
            extraction.provider_for(DocumentKind::Xlsx),
            ProviderKind::ParserService
        );
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config: Result<Config, _> = toml::from_str("[extraction]\npdf_provider = \"gemini\"\n");
        assert!(config.is_err());
    }
}
