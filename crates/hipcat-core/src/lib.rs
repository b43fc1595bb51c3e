//! Core types and delivery logic for hipcat
//!
//! This crate resolves the HipChat connection settings from config files,
//! environment variables and command-line overrides, and posts plain-text
//! messages to a room through the HipChat v2 REST API.
//!
//! Everything here is synchronous: one message is delivered at a time and the
//! first failure stops the batch.

pub mod client;
pub mod config;
pub mod home;
pub mod logging;
pub mod message;
pub mod relay;

pub use client::{DeliveryError, DeliveryOutcome, RoomClient};
pub use config::{resolve_config, Config, ConfigError, ConfigField, ConfigOverrides, ConfigPaths};
pub use message::RoomMessage;
pub use relay::{lossy_lines, message_from_args, relay, relay_lines, RelayError};
