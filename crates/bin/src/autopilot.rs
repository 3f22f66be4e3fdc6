//! Optional lobby automation for unattended runs.

use client::{Session, Transport, ViewMode};
use tracing::debug;

use crate::config::HeadlessConfig;

/// Joins and readies on behalf of a headless player. Steering is not handled
/// here; the configured intent is pressed once on the session at start-up.
#[derive(Debug, Default)]
pub struct Autopilot {
    auto_join: bool,
    auto_ready: bool,
    join_requested: bool,
    readied: Option<(String, u32)>,
}

impl Autopilot {
    pub fn new(config: &HeadlessConfig) -> Self {
        Self {
            auto_join: config.auto_join,
            auto_ready: config.auto_ready,
            ..Default::default()
        }
    }

    /// Forget per-connection progress.
    pub fn reset(&mut self) {
        self.join_requested = false;
        self.readied = None;
    }

    /// Look at the session after an event and issue at most one command.
    pub fn step(&mut self, session: &mut Session, transport: &dyn Transport) {
        if session.view().joined().is_some() {
            self.join_requested = false;
        }
        match session.view().mode() {
            ViewMode::LobbyList if self.auto_join => self.join(session, transport),
            ViewMode::Lobby if self.auto_ready => self.ready(session, transport),
            _ => {}
        }
    }

    fn join(&mut self, session: &mut Session, transport: &dyn Transport) {
        if self.join_requested || session.view().pending().is_some() {
            return;
        }
        self.join_requested = if session.lobbies().is_empty() {
            debug!("no lobbies, creating one");
            session.create_lobby(transport)
        } else {
            session.join_slot(0, transport)
        };
    }

    fn ready(&mut self, session: &mut Session, transport: &dyn Transport) {
        let (round_key, already_ready) = {
            let Some(lobby) = session.current_lobby() else {
                return;
            };
            let already_ready = session
                .identity()
                .player_id
                .as_deref()
                .and_then(|id| lobby.players.iter().find(|p| p.id == id))
                .is_some_and(|p| p.ready);
            ((lobby.lobby_id.clone(), lobby.round), already_ready)
        };
        if self.readied.as_ref() == Some(&round_key) {
            return;
        }
        if already_ready || session.toggle_ready(transport) {
            debug!(lobby = %round_key.0, round = round_key.1, "ready");
            self.readied = Some(round_key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::SocketTransport;
    use client::SessionEvent;
    use protocol::ClientMessage;
    use tokio::sync::mpsc;

    struct Rig {
        session: Session,
        autopilot: Autopilot,
        transport: SocketTransport,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl Rig {
        fn new() -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            let transport = SocketTransport::new(tx);
            let mut session = Session::new(None);
            session.dispatch(SessionEvent::Opened, &transport);
            let mut rig = Self {
                session,
                autopilot: Autopilot::new(&HeadlessConfig::default()),
                transport,
                rx,
            };
            rig.sent();
            rig
        }

        fn frame(&mut self, text: &str) {
            self.session.dispatch(SessionEvent::Frame(text.to_string()), &self.transport);
            self.autopilot.step(&mut self.session, &self.transport);
        }

        fn sent(&mut self) -> Vec<ClientMessage> {
            let mut sent = Vec::new();
            while let Ok(frame) = self.rx.try_recv() {
                sent.push(serde_json::from_str(&frame).unwrap());
            }
            sent
        }
    }

    #[test]
    fn test_creates_lobby_when_list_is_empty() {
        let mut rig = Rig::new();
        rig.frame(r#"{"type":"lobby_list","lobbies":[]}"#);
        assert_eq!(rig.sent(), vec![ClientMessage::NewLobby]);
        // Still waiting on confirmation: nothing more.
        rig.frame(r#"{"type":"lobby_list","lobbies":[]}"#);
        assert!(rig.sent().is_empty());
    }

    #[test]
    fn test_joins_first_lobby_and_readies_once_per_round() {
        let mut rig = Rig::new();
        rig.frame(r#"{"type":"welcome","playerId":"me"}"#);
        rig.frame(r#"{"type":"lobby_list","lobbies":[{"lobbyId":"b"},{"lobbyId":"a"}]}"#);
        assert_eq!(rig.sent(), vec![ClientMessage::JoinLobby { lobby_id: "a".into() }]);

        rig.frame(r#"{"type":"lobby_update","lobbyId":"a","round":1,"players":[{"id":"me","ready":false}]}"#);
        assert_eq!(rig.sent(), vec![ClientMessage::PlayerReady]);

        // Further updates in the same round do not toggle back.
        rig.frame(r#"{"type":"lobby_update","lobbyId":"a","players":[{"id":"me","ready":true}]}"#);
        rig.frame(r#"{"type":"lobby_update","lobbyId":"a","status":"countdown","countdown":3}"#);
        assert!(rig.sent().is_empty());

        rig.frame(r#"{"type":"lobby_update","lobbyId":"a","status":"playing"}"#);
        rig.frame(r#"{"type":"lobby_update","lobbyId":"a","status":"waiting","round":2,"players":[{"id":"me","ready":false}]}"#);
        assert_eq!(rig.sent(), vec![ClientMessage::PlayerReady]);
    }

    #[test]
    fn test_server_side_ready_is_not_toggled_off() {
        let mut rig = Rig::new();
        rig.frame(r#"{"type":"welcome","playerId":"me"}"#);
        rig.frame(r#"{"type":"lobby_list","lobbies":[{"lobbyId":"a"}]}"#);
        rig.sent();
        rig.frame(r#"{"type":"lobby_update","lobbyId":"a","players":[{"id":"me","ready":true}]}"#);
        assert!(rig.sent().is_empty());
    }
}
