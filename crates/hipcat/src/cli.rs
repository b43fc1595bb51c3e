//! Command-line surface and top-level flow

use anyhow::{Context, Result};
use clap::Parser;
use hipcat_core::config::{resolve_config, ConfigError, ConfigField, ConfigOverrides, ConfigPaths};
use hipcat_core::home::get_home_dir;
use hipcat_core::{message_from_args, relay_lines, DeliveryOutcome, RelayError, RoomClient};
use std::io;
use tracing::{debug, warn};

pub const USAGE: &str = "Usage: hipcat [-r room] [message]";

/// hipcat - relay text to a HipChat room
#[derive(Parser, Debug)]
#[command(
    name = "hipcat",
    version,
    about = "Relay text to a HipChat room",
    long_about = "Posts the given words as one message to a HipChat room. With no words, \
                  each line of stdin is posted as its own message.",
    override_usage = "hipcat [-r room] [message]..."
)]
pub struct Cli {
    /// Room to post to (overrides HIPCAT_ROOM and config files)
    #[arg(short, long)]
    room: Option<String>,

    /// Message text; omit to read messages from stdin, one per line
    message: Vec<String>,
}

impl Cli {
    /// Resolve config, then deliver the argument message or every stdin line
    pub fn execute(&self) -> Result<()> {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let home_dir = match get_home_dir() {
            Ok(home) => Some(home),
            Err(e) => {
                warn!("{e:#}; skipping per-user config");
                None
            }
        };

        let paths = ConfigPaths::new(home_dir.as_deref(), &current_dir);
        let overrides = ConfigOverrides {
            room: self.room.clone(),
        };
        let config = resolve_config(&paths, &overrides).context("Failed to load config")?;
        debug!("Resolved config: {config:?}");

        let client = RoomClient::new(&config).context("Post failed")?;

        if let Some(message) = message_from_args(&self.message) {
            client
                .post(&message)
                .and_then(DeliveryOutcome::into_result)
                .context("Post failed")?;
            return Ok(());
        }

        match relay_lines(&client, io::stdin().lock()) {
            Ok(count) => {
                debug!("Delivered {count} message(s) from stdin");
                Ok(())
            }
            Err(e @ RelayError::Input(_)) => Err(anyhow::Error::new(e).context("Error reading stdin")),
            Err(e) => Err(anyhow::Error::new(e).context("Post failed")),
        }
    }
}

/// Whether `err` is the missing-room config error, which also prints usage
pub fn is_missing_room(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ConfigError>()
        .and_then(ConfigError::missing_field)
        == Some(ConfigField::Room)
}
