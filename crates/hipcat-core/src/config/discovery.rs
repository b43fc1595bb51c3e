//! Configuration discovery and resolution

use super::types::{Config, ConfigField, ConfigLayer, ConfigPaths};
use serde::de::Error as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file exists but is not a valid JSON object
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required field is still empty after every source was applied
    #[error("Could not find {} in {sources}", field.with_article())]
    MissingField { field: ConfigField, sources: String },
}

impl ConfigError {
    /// The missing field, if this is a missing-field error
    pub fn missing_field(&self) -> Option<ConfigField> {
        match self {
            ConfigError::MissingField { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Room passed with `-r/--room`
    pub room: Option<String>,
}

/// Resolve configuration from all sources, reading the process environment
///
/// Priority (highest to lowest):
/// 1. Command-line overrides (room only)
/// 2. Environment variables (`HIPCHAT_URL`, `HIPCAT_ROOM`, `HIPCAT_API_TOKEN`)
/// 3. `./hipcat.conf`
/// 4. `~/.hipcat.conf`
/// 5. `/etc/hipcat.conf`
pub fn resolve_config(
    paths: &ConfigPaths,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    resolve_config_with_env(paths, overrides, |key| std::env::var(key).ok())
}

/// Resolve configuration with an explicit environment lookup
///
/// Same pipeline as [`resolve_config`], but `env` answers every environment
/// variable lookup. An unset or empty answer defines nothing.
///
/// # Errors
///
/// - [`ConfigError::Read`] / [`ConfigError::Parse`] for the first config file
///   that exists but cannot be read or parsed; later sources are not consulted
/// - [`ConfigError::MissingField`] for the first of `hipchat_url`,
///   `api_token`, `room` still empty after every source
///
/// # Examples
///
/// ```
/// use hipcat_core::config::{resolve_config_with_env, ConfigOverrides, ConfigPaths};
///
/// let dir = std::env::temp_dir().join("hipcat-doc-no-such-dir");
/// let paths = ConfigPaths {
///     system: dir.join("system.conf"),
///     home: None,
///     local: dir.join("hipcat.conf"),
/// };
/// let overrides = ConfigOverrides { room: Some("devs".to_string()) };
/// let env = |key: &str| match key {
///     "HIPCHAT_URL" => Some("https://x.example.com".to_string()),
///     "HIPCAT_ROOM" => Some("ignored".to_string()),
///     "HIPCAT_API_TOKEN" => Some("tok123".to_string()),
///     _ => None,
/// };
///
/// let config = resolve_config_with_env(&paths, &overrides, env).unwrap();
/// assert_eq!(config.room, "devs");
/// ```
pub fn resolve_config_with_env<F>(
    paths: &ConfigPaths,
    overrides: &ConfigOverrides,
    env: F,
) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut layers = ConfigLayer::default();

    for path in paths.iter() {
        if let Some(file_layer) = load_config_file(path)? {
            layers = layers.merge(file_layer);
        }
    }

    let layers = layers
        .merge(env_layer(env))
        .merge(cli_layer(overrides));

    let hipchat_url = require(&layers, ConfigField::HipchatUrl, paths)?;
    let api_token = require(&layers, ConfigField::ApiToken, paths)?;
    let room = require(&layers, ConfigField::Room, paths)?;

    Ok(Config {
        hipchat_url,
        room,
        api_token,
    })
}

/// Load one config file
///
/// Returns `Ok(None)` if the file does not exist.
fn load_config_file(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let parse_err = |source: serde_json::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(&contents).map_err(parse_err)?;
    if !value.is_object() {
        return Err(parse_err(serde_json::Error::custom(
            "expected a JSON object at the top level",
        )));
    }
    let layer = serde_json::from_value(value).map_err(parse_err)?;

    debug!("Loaded config file {}", path.display());
    Ok(Some(layer))
}

/// Environment variable layer; unset or empty variables define nothing
fn env_layer<F>(env: F) -> ConfigLayer
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |field: ConfigField| env(field.env_var()).filter(|v| !v.is_empty());
    ConfigLayer {
        hipchat_url: lookup(ConfigField::HipchatUrl),
        room: lookup(ConfigField::Room),
        api_token: lookup(ConfigField::ApiToken),
    }
}

fn cli_layer(overrides: &ConfigOverrides) -> ConfigLayer {
    ConfigLayer {
        room: overrides.room.clone().filter(|r| !r.is_empty()),
        ..Default::default()
    }
}

fn require(
    layers: &ConfigLayer,
    field: ConfigField,
    paths: &ConfigPaths,
) -> Result<String, ConfigError> {
    match layers.get(field) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ConfigError::MissingField {
            field,
            sources: paths.describe_sources(field),
        }),
    }
}
