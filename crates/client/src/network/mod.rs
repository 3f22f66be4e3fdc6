// WebSocket connection, transport seam and reconnect policy
use protocol::ClientMessage;
use wasm_bindgen::prelude::*;
use web_sys::WebSocket;

use crate::error::TransportError;

/// Lifecycle of the single server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Outbound half of a connection. The session only ever sees this trait, so
/// the browser socket, the native socket and test fakes are interchangeable.
pub trait Transport {
    fn state(&self) -> ConnectionState;

    fn send(&self, message: &ClientMessage) -> Result<(), TransportError>;

    fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }
}

/// Build the WebSocket URL.
///
/// An explicit `ws://`/`wss://` address is used as is, a bare `host[:port]/path`
/// gets the scheme matching the page, and without an override the endpoint is
/// `path` on the page's own host.
pub fn endpoint_url(server_url: Option<&str>, page_protocol: &str, page_host: &str, path: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
    match server_url {
        Some(url) if url.starts_with("ws://") || url.starts_with("wss://") => url.to_string(),
        Some(url) => format!("{}://{}", scheme, url),
        None => format!("{}://{}{}", scheme, page_host, path),
    }
}

/// Pending reconnect attempt handed to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectTicket {
    pub attempt: u64,
    pub delay_ms: u32,
}

/// Fixed-delay, infinite reconnect policy.
///
/// At most one attempt is pending at a time: repeated close/error
/// notifications collapse into the first ticket, and a ticket that is no
/// longer pending (the connection opened meanwhile) is refused by [`fire`].
///
/// [`fire`]: Reconnector::fire
#[derive(Debug)]
pub struct Reconnector {
    delay_ms: u32,
    attempts: u64,
    pending: Option<u64>,
}

impl Reconnector {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            attempts: 0,
            pending: None,
        }
    }

    /// Connection lost. Returns a ticket unless one is already pending.
    pub fn schedule(&mut self) -> Option<ReconnectTicket> {
        if self.pending.is_some() {
            return None;
        }
        self.attempts += 1;
        self.pending = Some(self.attempts);
        Some(ReconnectTicket {
            attempt: self.attempts,
            delay_ms: self.delay_ms,
        })
    }

    /// Timer elapsed. True when the caller should open a new connection now.
    pub fn fire(&mut self, ticket: ReconnectTicket) -> bool {
        if self.pending == Some(ticket.attempt) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Connection established; any outstanding ticket becomes stale.
    pub fn opened(&mut self) {
        self.pending = None;
    }
}

/// Browser WebSocket carrying JSON text frames.
pub struct Connection {
    ws: WebSocket,
    url: String,
}

impl Connection {
    pub fn open(url: &str) -> Result<Self, JsValue> {
        tracing::info!(%url, "connecting");
        let ws = WebSocket::new(url)?;
        Ok(Self {
            ws,
            url: url.to_string(),
        })
    }

    pub fn websocket(&self) -> &WebSocket {
        &self.ws
    }

    /// Drop the old socket (handlers detached first, so it can no longer
    /// queue events) and open a fresh one to the same endpoint.
    pub fn reconnect(&mut self) -> Result<WebSocket, JsValue> {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();

        tracing::info!(url = %self.url, "reconnecting");
        let ws = WebSocket::new(&self.url)?;
        self.ws = ws;
        Ok(self.ws.clone())
    }
}

impl Transport for Connection {
    fn state(&self) -> ConnectionState {
        match self.ws.ready_state() {
            WebSocket::CONNECTING => ConnectionState::Connecting,
            WebSocket::OPEN => ConnectionState::Open,
            _ => ConnectionState::Closed,
        }
    }

    fn send(&self, message: &ClientMessage) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        let frame = message.encode()?;
        self.ws
            .send_with_str(&frame)
            .map_err(|e| TransportError::Socket(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_page_host() {
        assert_eq!(
            endpoint_url(None, "http:", "localhost:8000", "/ws/game"),
            "ws://localhost:8000/ws/game"
        );
        assert_eq!(
            endpoint_url(None, "https:", "curve.example", "/ws/game"),
            "wss://curve.example/ws/game"
        );
    }

    #[test]
    fn test_endpoint_override() {
        assert_eq!(
            endpoint_url(Some("ws://10.0.0.2:9000/play"), "https:", "ignored", "/ws/game"),
            "ws://10.0.0.2:9000/play"
        );
        assert_eq!(
            endpoint_url(Some("10.0.0.2:9000/play"), "https:", "ignored", "/ws/game"),
            "wss://10.0.0.2:9000/play"
        );
    }

    #[test]
    fn test_close_storm_schedules_once() {
        let mut reconnect = Reconnector::new(1000);
        let ticket = reconnect.schedule().unwrap();
        assert_eq!(ticket.delay_ms, 1000);
        assert_eq!(reconnect.schedule(), None);
        assert_eq!(reconnect.schedule(), None);

        assert!(reconnect.fire(ticket));
        // A second fire of the same ticket must not open another socket.
        assert!(!reconnect.fire(ticket));
    }

    #[test]
    fn test_failed_attempt_schedules_again_with_same_delay() {
        let mut reconnect = Reconnector::new(1000);
        let first = reconnect.schedule().unwrap();
        assert!(reconnect.fire(first));

        let second = reconnect.schedule().unwrap();
        assert_ne!(first.attempt, second.attempt);
        assert_eq!(second.delay_ms, 1000);
    }

    #[test]
    fn test_open_makes_pending_ticket_stale() {
        let mut reconnect = Reconnector::new(1000);
        let ticket = reconnect.schedule().unwrap();
        reconnect.opened();
        assert!(!reconnect.fire(ticket));
        // Nothing pending any more, so the next loss schedules afresh.
        assert!(reconnect.schedule().is_some());
    }
}
