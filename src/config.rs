//! Client configuration: optional JSON file, environment overrides, built-in defaults.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::error::ConfigError;

/// Default location on disk where the client looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/nuru-clock.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "NURU_CLOCK_CONFIG_PATH";
/// Environment variable holding the host websocket endpoint.
const WEBSOCKET_URI_ENV: &str = "WEBSOCKET_URI";
/// Environment variable overriding the game title announced to the host.
const GAME_TITLE_ENV: &str = "NURU_CLOCK_GAME_TITLE";

const DEFAULT_WEBSOCKET_URI: &str = "ws://localhost:8000";
const DEFAULT_GAME_TITLE: &str = "Nuru Clock";

/// Immutable runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct AppConfig {
    /// Endpoint of the game API host.
    #[validate(url)]
    pub websocket_uri: String,
    /// Game name sent with every message.
    #[validate(length(min = 1))]
    pub game_title: String,
    /// Whether context messages are sent silently.
    pub context_silent: bool,
}

impl AppConfig {
    /// Load the configuration from disk and the environment, then validate it.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file().unwrap_or_default();

        if let Some(uri) = non_empty_env(WEBSOCKET_URI_ENV) {
            config.websocket_uri = uri;
        }
        if let Some(title) = non_empty_env(GAME_TITLE_ENV) {
            config.game_title = title;
        }

        config.validated()
    }

    /// Check field constraints and the websocket scheme.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        if !(self.websocket_uri.starts_with("ws://") || self.websocket_uri.starts_with("wss://")) {
            return Err(ConfigError::UnsupportedScheme(self.websocket_uri));
        }
        Ok(self)
    }

    /// Read the JSON file, if any. Read or parse failures are logged and ignored.
    fn from_file() -> Option<Self> {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded client config");
                    Some(raw.into())
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    None
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                None
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                None
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            websocket_uri: DEFAULT_WEBSOCKET_URI.into(),
            game_title: DEFAULT_GAME_TITLE.into(),
            context_silent: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file; every field is optional.
struct RawConfig {
    websocket_uri: Option<String>,
    game_title: Option<String>,
    context_silent: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            websocket_uri: value.websocket_uri.unwrap_or(defaults.websocket_uri),
            game_title: value.game_title.unwrap_or(defaults.game_title),
            context_silent: value.context_silent.unwrap_or(defaults.context_silent),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
