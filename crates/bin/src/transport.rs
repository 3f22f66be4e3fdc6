//! `Transport` over a tokio channel feeding the socket writer.

use std::cell::Cell;

use client::{ConnectionState, Transport, TransportError};
use protocol::ClientMessage;
use tokio::sync::mpsc;

/// Encodes commands and hands the text frames to the connection loop, which
/// owns the write half of the socket.
pub struct SocketTransport {
    tx: mpsc::UnboundedSender<String>,
    state: Cell<ConnectionState>,
}

impl SocketTransport {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            tx,
            state: Cell::new(ConnectionState::Open),
        }
    }

    /// No socket behind it; every send fails with `NotOpen`.
    pub fn disconnected() -> Self {
        let (tx, _) = mpsc::unbounded_channel();
        let transport = Self::new(tx);
        transport.set_state(ConnectionState::Closed);
        transport
    }

    pub fn set_state(&self, state: ConnectionState) {
        self.state.set(state);
    }
}

impl Transport for SocketTransport {
    fn state(&self) -> ConnectionState {
        self.state.get()
    }

    fn send(&self, message: &ClientMessage) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        let frame = message.encode()?;
        self.tx
            .send(frame)
            .map_err(|_| TransportError::Socket("writer gone".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_reach_the_writer_only_while_open() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = SocketTransport::new(tx);

        transport.send(&ClientMessage::GetLobbies).unwrap();
        assert_eq!(rx.try_recv().unwrap(), r#"{"type":"get_lobbies"}"#);

        transport.set_state(ConnectionState::Closed);
        assert!(matches!(
            transport.send(&ClientMessage::PlayerReady),
            Err(TransportError::NotOpen)
        ));
        assert!(rx.try_recv().is_err());
    }
}
