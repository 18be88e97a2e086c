use crate::domain::SelectionScope;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub storage_key_prefix: String,
    pub selection_scope: SelectionScope,
    pub max_split_count: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let storage_key_prefix = env_map
            .get("STORAGE_KEY_PREFIX")
            .cloned()
            .unwrap_or_else(|| "split_".to_string());

        let selection_scope = SelectionScope::from_str(
            env_map
                .get("SELECTION_SCOPE")
                .map(|s| s.as_str())
                .unwrap_or("shared"),
        )
        .map_err(|_| {
            ConfigError::InvalidValue(
                "SELECTION_SCOPE".to_string(),
                "must be shared or per_policy".to_string(),
            )
        })?;

        let max_split_count = env_map
            .get("MAX_SPLIT_COUNT")
            .map(|s| s.as_str())
            .unwrap_or("1000")
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "MAX_SPLIT_COUNT".to_string(),
                    "must be a positive u32".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            storage_key_prefix,
            selection_scope,
            max_split_count,
        })
    }
}
