//! HipChat room client
//!
//! Posts a single [`RoomMessage`] to `{hipchat_url}/v2/room/{room}/message`
//! and reports whether the server accepted it.

use crate::config::Config;
use crate::message::RoomMessage;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::fmt;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Result of a delivery that got a response from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Server answered `201 Created`
    Delivered,
    /// Server answered with any other status
    Rejected { status: u16, body: String },
}

impl DeliveryOutcome {
    /// Whether the server answered `201 Created`
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    /// Treat a rejection as an error
    ///
    /// # Errors
    ///
    /// [`DeliveryError::Rejected`] carrying the status and response body.
    ///
    /// # Examples
    ///
    /// ```
    /// use hipcat_core::DeliveryOutcome;
    ///
    /// assert!(DeliveryOutcome::Delivered.into_result().is_ok());
    ///
    /// let rejected = DeliveryOutcome::Rejected {
    ///     status: 401,
    ///     body: r#"{"error":"unauthorized"}"#.to_string(),
    /// };
    /// let err = rejected.into_result().unwrap_err();
    /// assert_eq!(err.to_string(), r#"Not OK: 401, {"error":"unauthorized"}"#);
    /// ```
    pub fn into_result(self) -> Result<(), DeliveryError> {
        match self {
            DeliveryOutcome::Delivered => Ok(()),
            DeliveryOutcome::Rejected { status, body } => {
                Err(DeliveryError::Rejected { status, body })
            }
        }
    }
}

/// Delivery error
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Message could not be encoded as JSON
    #[error("Failed to encode message")]
    Serialization(#[from] serde_json::Error),

    /// The configured base URL cannot be turned into a room URL
    #[error("Invalid HipChat URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request could not be sent or the response could not be read
    #[error("Request to HipChat failed")]
    Transport(#[source] reqwest::Error),

    /// Server responded with something other than `201 Created`
    #[error("Not OK: {status}, {body}")]
    Rejected { status: u16, body: String },
}

/// Blocking client bound to one room
pub struct RoomClient {
    http: Client,
    endpoint: Url,
    api_token: String,
}

impl RoomClient {
    /// Build a client for the room named in `config`
    ///
    /// The target URL is computed once here and reused for every post.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::InvalidUrl`] if `hipchat_url` does not parse or
    ///   cannot carry a path
    /// - [`DeliveryError::Transport`] if the HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use hipcat_core::{Config, RoomClient};
    ///
    /// let config = Config {
    ///     hipchat_url: "https://x.example.com".to_string(),
    ///     room: "devs".to_string(),
    ///     api_token: "tok123".to_string(),
    /// };
    /// let client = RoomClient::new(&config).unwrap();
    /// assert_eq!(
    ///     client.endpoint().as_str(),
    ///     "https://x.example.com/v2/room/devs/message"
    /// );
    /// ```
    pub fn new(config: &Config) -> Result<Self, DeliveryError> {
        let endpoint = room_message_url(&config.hipchat_url, &config.room)?;
        let http = Client::builder()
            .build()
            .map_err(DeliveryError::Transport)?;

        Ok(Self {
            http,
            endpoint,
            api_token: config.api_token.clone(),
        })
    }

    /// URL every message is posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post one message
    ///
    /// Sends `Authorization: Bearer <token>` and `Content-Type:
    /// application/json`. There is no retry.
    ///
    /// # Returns
    ///
    /// [`DeliveryOutcome::Delivered`] for `201 Created`, otherwise
    /// [`DeliveryOutcome::Rejected`] with the status and raw body.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::Serialization`] if the payload cannot be encoded
    /// - [`DeliveryError::Transport`] if no response was received or its
    ///   body could not be read
    pub fn post(&self, message: &RoomMessage) -> Result<DeliveryOutcome, DeliveryError> {
        let body = message.encode()?;

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(DeliveryError::Transport)?;

        let status = response.status();
        if status == StatusCode::CREATED {
            debug!("Posted {} bytes to {}", message.text().len(), self.endpoint);
            return Ok(DeliveryOutcome::Delivered);
        }

        let body = response.text().map_err(DeliveryError::Transport)?;
        debug!("HipChat rejected message with status {status}");
        Ok(DeliveryOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl fmt::Debug for RoomClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

/// Build `{base}/v2/room/{room}/message`
///
/// The room is appended as a single percent-encoded path segment. Any path
/// already on the base URL is kept; a trailing slash on it is dropped.
fn room_message_url(base: &str, room: &str) -> Result<Url, DeliveryError> {
    let invalid = |reason: String| DeliveryError::InvalidUrl {
        url: base.to_string(),
        reason,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["v2", "room", room, "message"]);
    Ok(url)
}
