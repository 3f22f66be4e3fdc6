//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while decoding or encoding a frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Frame is not a JSON object")]
    NotAnObject,

    #[error("Frame has no message type")]
    MissingType,

    #[error("Message type is not a string")]
    InvalidType,
}
