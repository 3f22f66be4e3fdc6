// Test doubles shared by the unit tests
use std::cell::{Cell, RefCell};

use protocol::ClientMessage;

use crate::error::TransportError;
use crate::network::{ConnectionState, Transport};

/// Transport that records every command instead of sending it.
pub struct RecordingTransport {
    state: Cell<ConnectionState>,
    sent: RefCell<Vec<ClientMessage>>,
}

impl RecordingTransport {
    pub fn open() -> Self {
        Self {
            state: Cell::new(ConnectionState::Open),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn closed() -> Self {
        let transport = Self::open();
        transport.set_state(ConnectionState::Closed);
        transport
    }

    pub fn set_state(&self, state: ConnectionState) {
        self.state.set(state);
    }

    /// Drain what was sent so far.
    pub fn take(&self) -> Vec<ClientMessage> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }
}

impl Transport for RecordingTransport {
    fn state(&self) -> ConnectionState {
        self.state.get()
    }

    fn send(&self, message: &ClientMessage) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}
