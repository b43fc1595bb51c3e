//! Home directory resolution
//!
//! The per-user config file lives at `<home>/.hipcat.conf`. The home
//! directory is resolved as:
//!
//! 1. `HIPCAT_HOME` environment variable (if set and non-blank)
//! 2. `dirs::home_dir()` platform default
//!
//! `HIPCAT_HOME` exists mainly so integration tests can point the binary at a
//! temporary directory:
//!
//! ```ignore
//! use assert_cmd::Command;
//! use tempfile::TempDir;
//!
//! let temp_dir = TempDir::new().unwrap();
//! let mut cmd = Command::cargo_bin("hipcat").unwrap();
//! cmd.env("HIPCAT_HOME", temp_dir.path());
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the home directory used to locate the per-user config file
///
/// # Precedence
///
/// 1. `HIPCAT_HOME` environment variable (if set and non-blank, surrounding
///    whitespace trimmed)
/// 2. `dirs::home_dir()` platform default
///
/// # Returns
///
/// The home directory as a `PathBuf`. `.hipcat.conf` is looked up directly
/// inside it.
///
/// # Errors
///
/// Returns an error if:
/// - `HIPCAT_HOME` is unset or blank AND
/// - the platform home directory cannot be determined via `dirs::home_dir()`
///
/// # Examples
///
/// ```
/// use hipcat_core::home::get_home_dir;
///
/// # fn example() -> anyhow::Result<()> {
/// let home = get_home_dir()?;
/// let user_config = home.join(".hipcat.conf");
/// assert!(user_config.ends_with(".hipcat.conf"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HIPCAT_HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    dirs::home_dir().context("Could not determine home directory")
}
