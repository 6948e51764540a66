use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::game::PlayerNames;

/// Where the shared game state lives.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            dir: PathBuf::from(".connect4-store"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long to wait for a key press before checking the store again.
    pub poll_interval_ms: u64,
    /// How long the win celebration stays on screen.
    pub celebration_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            poll_interval_ms: 100,
            celebration_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    /// Names used when the lobby is left blank or nothing is stored.
    pub default_names: [String; 2],
}

impl Default for PlayersConfig {
    fn default() -> Self {
        let names = PlayerNames::default();
        PlayersConfig {
            default_names: names.as_array().clone(),
        }
    }
}

impl PlayersConfig {
    pub fn names(&self) -> PlayerNames {
        PlayerNames::from(self.default_names.clone())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: PathBuf,
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: PathBuf::from("connect4.log"),
            filter: "info".to_string(),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub ui: UiConfig,
    pub players: PlayersConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or `None` if the file does not exist.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("store.dir must not be empty".into()));
        }
        if self.ui.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.poll_interval_ms must be > 0".into(),
            ));
        }
        if self.ui.celebration_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.celebration_ms must be > 0".into(),
            ));
        }
        if self
            .players
            .default_names
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "players.default_names must not be blank".into(),
            ));
        }
        if self.logging.file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "logging.file must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values, printed by
    /// `--print-default-config`.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
