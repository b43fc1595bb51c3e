//! Configuration resolution
//!
//! Resolves the HipChat connection settings from multiple sources, with
//! later sources overriding earlier ones per field:
//! 1. System config (`/etc/hipcat.conf`)
//! 2. User config (`~/.hipcat.conf`)
//! 3. Current-directory config (`./hipcat.conf`)
//! 4. Environment variables
//! 5. Command-line flags (room only)

mod discovery;
mod types;

pub use discovery::{resolve_config, resolve_config_with_env, ConfigError, ConfigOverrides};
pub use types::{Config, ConfigField, ConfigLayer, ConfigPaths};
