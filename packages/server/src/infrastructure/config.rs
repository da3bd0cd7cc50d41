//! Server configuration loaded from a JSON file.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{RoomName, ValueObjectError};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "roomcast.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid default room: {0}")]
    InvalidDefaultRoom(#[from] ValueObjectError),
}

/// Operational parameters. Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Room used when a client connects without naming one
    pub default_room: String,
    /// Empty rooms older than this are reclaimed by the background sweep
    pub empty_room_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            default_room: "lobby".to_string(),
            empty_room_ttl_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Read the config at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.default_room_name()?;
        Ok(config)
    }

    /// Read the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        config.save(path)?;
        tracing::info!("Config file not found, wrote defaults to {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `host:port` for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn empty_room_ttl(&self) -> Duration {
        Duration::from_secs(self.empty_room_ttl_secs)
    }

    pub fn default_room_name(&self) -> Result<RoomName, ConfigError> {
        Ok(RoomName::new(self.default_room.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "roomcast-config-{}-{}.json",
            name,
            uuid::Uuid::new_v4()
        ))
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        // テスト項目: 設定ファイルが無い場合はデフォルト値で作成される
        // given (前提条件):
        let path = temp_path("create");

        // when (操作):
        let config = ServerConfig::load_or_create(&path).unwrap();

        // then (期待する結果):
        assert_eq!(config, ServerConfig::default());
        assert!(path.exists());
        assert_eq!(ServerConfig::load(&path).unwrap(), config);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_partial_file_uses_defaults_for_missing_keys() {
        // テスト項目: 一部のキーのみの設定ファイルでも残りはデフォルト値になる
        let path = temp_path("partial");
        fs::write(&path, r#"{ "port": 9000, "default_room": "general" }"#).unwrap();

        let config = ServerConfig::load(&path).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.empty_room_ttl(), Duration::from_secs(300));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.default_room_name().unwrap().as_str(), "general");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();

        let result = ServerConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_empty_default_room_fails() {
        let path = temp_path("empty-room");
        fs::write(&path, r#"{ "default_room": "" }"#).unwrap();

        let result = ServerConfig::load(&path);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDefaultRoom(ValueObjectError::RoomNameEmpty))
        ));
        fs::remove_file(&path).unwrap();
    }
}
