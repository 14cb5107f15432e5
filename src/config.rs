use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::io::ErrorKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Upper bound on how long to keep retrying an unreachable store
    #[serde(default = "default_connect_retry_secs")]
    pub connect_retry_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaConfig {
    /// None means the latest revision
    #[serde(default)]
    pub target_revision: Option<usize>,
    #[serde(default)]
    pub seed_sample_data: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_retry_secs() -> u64 {
    30
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            connect_retry_secs: default_connect_retry_secs(),
        }
    }
}

impl Config {
    /// Reads `CONFIG_PATH` (default `config.toml`); environment variables override the file.
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let file = match std::fs::read_to_string(&config_path) {
            Ok(contents) => Some(contents),
            // no file: rely entirely on the environment
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "cannot read config file {config_path}: {e}"
                )));
            }
        };

        Self::from_sources(file.as_deref(), &env::vars().collect())
    }

    pub fn from_sources(file: Option<&str>, env_map: &HashMap<String, String>) -> AppResult<Self> {
        let get_env = |name: &str| env_map.get(name).cloned();

        let mut config: Config = match file {
            Some(contents) => toml::from_str(contents)
                .map_err(|e| AppError::ConfigError(format!("invalid config file: {e}")))?,
            None => {
                let url = get_env("DATABASE_URL").ok_or_else(|| {
                    AppError::ConfigError(
                        "DATABASE_URL is not set and no config file was found".to_string(),
                    )
                })?;
                Config {
                    database: DatabaseConfig::new(url),
                    schema: SchemaConfig::default(),
                }
            }
        };

        if let Some(v) = get_env("DATABASE_URL") {
            config.database.url = v;
        }
        if let Some(v) = get_env("DB_MAX_CONNECTIONS") {
            config.database.max_connections = parse_env("DB_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = get_env("DB_CONNECT_RETRY_SECS") {
            config.database.connect_retry_secs = parse_env("DB_CONNECT_RETRY_SECS", &v)?;
        }
        if let Some(v) = get_env("SCHEMA_TARGET_REVISION") {
            config.schema.target_revision = Some(parse_env("SCHEMA_TARGET_REVISION", &v)?);
        }
        if let Some(v) = get_env("SEED_SAMPLE_DATA") {
            config.schema.seed_sample_data = parse_flag("SEED_SAMPLE_DATA", &v)?;
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::ConfigError(format!("invalid value for {name}: {value}")))
}

fn parse_flag(name: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::ConfigError(format!(
            "invalid value for {name}: {value}"
        ))),
    }
}
