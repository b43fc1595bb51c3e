//! Sequential, fail-fast delivery of a batch of messages

use crate::client::{DeliveryError, DeliveryOutcome, RoomClient};
use crate::message::RoomMessage;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

/// Error that stopped a batch
#[derive(Debug, Error)]
pub enum RelayError {
    /// Reading the next message failed
    #[error("Failed to read message")]
    Input(#[source] io::Error),

    /// Delivering a message failed; `line` is 1-based
    #[error("Message {line} was not delivered")]
    Delivery {
        line: usize,
        #[source]
        source: DeliveryError,
    },
}

/// Join command-line words into one message
///
/// Words are joined with single spaces.
///
/// # Returns
///
/// `None` when there are no words, meaning input comes from stdin.
///
/// # Examples
///
/// ```
/// use hipcat_core::{message_from_args, RoomMessage};
///
/// let words = vec!["deploy".to_string(), "done".to_string()];
/// assert_eq!(message_from_args(&words), Some(RoomMessage::new("deploy done")));
/// assert_eq!(message_from_args(&[]), None);
/// ```
pub fn message_from_args(words: &[String]) -> Option<RoomMessage> {
    if words.is_empty() {
        None
    } else {
        Some(RoomMessage::new(words.join(" ")))
    }
}

/// Deliver messages in order, stopping at the first failure
///
/// Each message is posted only after the previous one was accepted.
///
/// # Returns
///
/// How many messages were delivered.
///
/// # Errors
///
/// - [`RelayError::Input`] when reading the next message fails
/// - [`RelayError::Delivery`] when a post fails or is rejected
///
/// Nothing after the failing item is attempted.
pub fn relay<I>(client: &RoomClient, messages: I) -> Result<usize, RelayError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut delivered = 0;

    for (index, text) in messages.into_iter().enumerate() {
        let text = text.map_err(RelayError::Input)?;
        let line = index + 1;

        client
            .post(&RoomMessage::new(text))
            .and_then(DeliveryOutcome::into_result)
            .map_err(|source| RelayError::Delivery { line, source })?;

        delivered += 1;
        debug!("Delivered message {line}");
    }

    Ok(delivered)
}

/// Deliver one message per line of `reader`
///
/// Lines are split with [`lossy_lines`], so bytes that are not valid UTF-8
/// are sent as U+FFFD instead of stopping the batch.
pub fn relay_lines<R: BufRead>(client: &RoomClient, reader: R) -> Result<usize, RelayError> {
    relay(client, lossy_lines(reader))
}

/// Split `reader` into lines, decoding each one lossily
///
/// A trailing `\n` or `\r\n` is stripped. Invalid UTF-8 is replaced with
/// U+FFFD; only genuine read failures are yielded as errors.
///
/// # Examples
///
/// ```
/// use hipcat_core::relay::lossy_lines;
///
/// let lines: Vec<String> = lossy_lines(&b"caf\xe9\r\nok"[..])
///     .collect::<std::io::Result<_>>()
///     .unwrap();
/// assert_eq!(lines, vec!["caf\u{fffd}", "ok"]);
/// ```
pub fn lossy_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = io::Result<String>> {
    let mut buf = Vec::new();
    std::iter::from_fn(move || {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    })
}
