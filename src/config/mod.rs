use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub client: ClientConfig,
    pub history: HistoryConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    /// "json" включает JSON-логи, иначе обычный текст.
    pub log_format: String,
}

// Каталог сохраненных проектов
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub projects_dir: PathBuf,
}

// Клиент сервиса хранения
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// История undo/redo
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// `None` - без ограничения.
    pub max_entries: Option<usize>,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = var_or(name, default);
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value,
    })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_entries = match env::var("HISTORY_MAX_ENTRIES") {
            Ok(value) if !value.trim().is_empty() => Some(value.parse().map_err(|_| {
                ConfigError::Invalid {
                    name: "HISTORY_MAX_ENTRIES",
                    expected: "a positive number",
                    value: value.clone(),
                }
            })?),
            _ => None,
        };

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parse_var("PORT", "8000", "a valid port number")?,
                environment: var_or("ENVIRONMENT", "development"),
                rust_log: var_or("RUST_LOG", "seating_planner=debug,tower_http=debug"),
                log_format: var_or("LOG_FORMAT", "text"),
            },
            storage: StorageConfig {
                projects_dir: PathBuf::from(var_or("PROJECTS_DIR", "projects")),
            },
            client: ClientConfig {
                base_url: var_or("SEATING_API_URL", "http://127.0.0.1:8000/api"),
                timeout_seconds: parse_var("SEATING_API_TIMEOUT_SECONDS", "30", "a valid number")?,
            },
            history: HistoryConfig { max_entries },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "seating_planner=debug,tower_http=debug".to_string(),
                log_format: "text".to_string(),
            },
            storage: StorageConfig {
                projects_dir: PathBuf::from("projects"),
            },
            client: ClientConfig {
                base_url: "http://127.0.0.1:8000/api".to_string(),
                timeout_seconds: 30,
            },
            history: HistoryConfig { max_entries: None },
        }
    }
}
