//! Configuration types

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the system-wide config
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hipcat.conf";
/// File name of the per-user config, relative to the home directory
pub const HOME_CONFIG_FILE: &str = ".hipcat.conf";
/// File name of the config in the current directory
pub const LOCAL_CONFIG_FILE: &str = "hipcat.conf";

/// Effective configuration used for every delivery in one run
///
/// All fields are non-empty once resolution succeeds.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the HipChat server, e.g. `https://example.hipchat.com`
    pub hipchat_url: String,
    /// Room name or id messages are posted to
    pub room: String,
    /// API token sent as a bearer token
    pub api_token: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hipchat_url", &self.hipchat_url)
            .field("room", &self.room)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// One source's contribution to the configuration
///
/// A `Some` field overrides whatever the accumulated layers hold; `None`
/// leaves it untouched. This is also the on-disk schema of a config file.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub hipchat_url: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl ConfigLayer {
    /// Apply `over` on top of `self`, field by field
    ///
    /// # Examples
    ///
    /// ```
    /// use hipcat_core::config::{ConfigField, ConfigLayer};
    ///
    /// let file = ConfigLayer {
    ///     room: Some("ops".to_string()),
    ///     api_token: Some("t".to_string()),
    ///     ..Default::default()
    /// };
    /// let env = ConfigLayer {
    ///     room: Some("devs".to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// let merged = file.merge(env);
    /// assert_eq!(merged.get(ConfigField::Room), Some("devs"));
    /// assert_eq!(merged.get(ConfigField::ApiToken), Some("t"));
    /// ```
    pub fn merge(self, over: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            hipchat_url: over.hipchat_url.or(self.hipchat_url),
            room: over.room.or(self.room),
            api_token: over.api_token.or(self.api_token),
        }
    }

    /// Value currently held for `field`, if any
    pub fn get(&self, field: ConfigField) -> Option<&str> {
        match field {
            ConfigField::HipchatUrl => self.hipchat_url.as_deref(),
            ConfigField::Room => self.room.as_deref(),
            ConfigField::ApiToken => self.api_token.as_deref(),
        }
    }
}

impl fmt::Debug for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLayer")
            .field("hipchat_url", &self.hipchat_url)
            .field("room", &self.room)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A required configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    HipchatUrl,
    Room,
    ApiToken,
}

impl ConfigField {
    /// Environment variable that overrides this field
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigField::HipchatUrl => "HIPCHAT_URL",
            ConfigField::Room => "HIPCAT_ROOM",
            ConfigField::ApiToken => "HIPCAT_API_TOKEN",
        }
    }

    /// Human-readable name used in diagnostics
    pub fn display_name(self) -> &'static str {
        match self {
            ConfigField::HipchatUrl => "HipchatURL",
            ConfigField::Room => "Room",
            ConfigField::ApiToken => "APIToken",
        }
    }

    /// Display name with its indefinite article, e.g. "an APIToken"
    pub fn with_article(self) -> String {
        let article = match self {
            ConfigField::ApiToken => "an",
            _ => "a",
        };
        format!("{article} {}", self.display_name())
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Candidate config file locations, in the order they are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub system: PathBuf,
    /// `None` when no home directory could be determined
    pub home: Option<PathBuf>,
    pub local: PathBuf,
}

impl ConfigPaths {
    /// Standard locations for the given home and working directories
    pub fn new(home_dir: Option<&Path>, current_dir: &Path) -> Self {
        Self {
            system: PathBuf::from(SYSTEM_CONFIG_PATH),
            home: home_dir.map(|home| home.join(HOME_CONFIG_FILE)),
            local: current_dir.join(LOCAL_CONFIG_FILE),
        }
    }

    /// Paths in precedence order, lowest first
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.system.as_path())
            .chain(self.home.as_deref())
            .chain(std::iter::once(self.local.as_path()))
    }

    /// Comma-separated list of every source consulted for `field`
    pub fn describe_sources(&self, field: ConfigField) -> String {
        let mut sources = vec![field.env_var().to_string()];
        sources.extend(self.iter().map(|p| p.display().to_string()));
        let mut described = sources.join(", ");
        if field == ConfigField::Room {
            described.push_str(" or passed with -r/--room");
        }
        described
    }
}
