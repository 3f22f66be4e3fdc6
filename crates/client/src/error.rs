//! Client-side error types.

use protocol::ProtocolError;
use thiserror::Error;

/// Errors reported by a [`Transport`](crate::network::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection is not open")]
    NotOpen,

    #[error("Failed to encode command: {0}")]
    Encode(#[from] ProtocolError),

    #[error("Socket error: {0}")]
    Socket(String),
}
