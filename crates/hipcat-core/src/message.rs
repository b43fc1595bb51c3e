//! Room message wire payload

use serde::{Deserialize, Serialize};

/// Body of a `POST /v2/room/{room}/message` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMessage {
    /// Plain-text message
    pub message: String,
}

impl RoomMessage {
    /// Create a message from plain text
    ///
    /// The text is sent as-is: no formatting, trimming or escaping beyond
    /// what JSON encoding requires.
    ///
    /// # Examples
    ///
    /// ```
    /// use hipcat_core::RoomMessage;
    ///
    /// let msg = RoomMessage::new("build #42 passed");
    /// assert_eq!(msg.text(), "build #42 passed");
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
        }
    }

    /// Message text
    pub fn text(&self) -> &str {
        &self.message
    }

    /// Encode as the JSON request body
    ///
    /// # Errors
    ///
    /// Returns the serializer error if encoding fails. A plain string field
    /// always encodes, so this is not expected in practice.
    ///
    /// # Examples
    ///
    /// ```
    /// use hipcat_core::RoomMessage;
    ///
    /// let body = RoomMessage::new(r#"say "hi""#).encode().unwrap();
    /// assert_eq!(body, r#"{"message":"say \"hi\""}"#);
    /// assert_eq!(RoomMessage::decode(&body).unwrap().text(), r#"say "hi""#);
    /// ```
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a JSON request body
    ///
    /// # Errors
    ///
    /// Fails if `body` is not JSON or has no string `message` field.
    pub fn decode(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}
