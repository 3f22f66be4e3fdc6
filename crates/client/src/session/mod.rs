// Session - the single context every handler works on
//
// All client state lives here and is only touched through `dispatch` (socket
// events, in receipt order) and the local-action methods. Front ends own the
// transport and hand it in by reference; the session never stores it.
use protocol::{ClientMessage, Direction, GameState, LobbyUpdate};
use tracing::{debug, info, warn};

use crate::game::GameSnapshot;
use crate::input::{InputController, KeyAction};
use crate::lobby::{LobbyRegistry, LobbySummary};
use crate::network::Transport;
use crate::view::{ViewMode, ViewState};

mod router;

pub use router::route;

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Opened,
    Frame(String),
    Closed { code: u16, reason: String },
    Errored(String),
}

/// Who we are on the server.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    /// From `welcome`; valid for one connection only.
    pub player_id: Option<String>,
    /// Chosen locally; re-announced on every open.
    pub name: Option<String>,
}

impl Identity {
    /// Whether `summary` lists us: by id once `welcome` arrived, else by
    /// name. `None` when we know neither.
    ///
    /// A name match only confirms a join; once joined, a rename can race the
    /// server's next summary, so a missing name does not count as being dropped.
    fn membership(&self, summary: &LobbySummary, joined: bool) -> Option<bool> {
        if let Some(id) = self.player_id.as_deref() {
            return Some(summary.has_player(id));
        }
        match self.name.as_deref() {
            Some(_) if joined => None,
            Some(name) => Some(summary.has_player_named(name)),
            None => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    view: ViewState,
    lobbies: LobbyRegistry,
    game: GameSnapshot,
    input: InputController,
    identity: Identity,
}

impl Session {
    pub fn new(player_name: Option<String>) -> Self {
        Self {
            identity: Identity {
                player_id: None,
                name: player_name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
            },
            ..Default::default()
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn lobbies(&self) -> &LobbyRegistry {
        &self.lobbies
    }

    pub fn game(&self) -> &GameSnapshot {
        &self.game
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn intent(&self) -> Direction {
        self.input.intent()
    }

    /// Summary of the lobby we are in, if any.
    pub fn current_lobby(&self) -> Option<&LobbySummary> {
        self.view.joined().and_then(|id| self.lobbies.get(id))
    }

    /// Apply one connection event.
    pub fn dispatch(&mut self, event: SessionEvent, transport: &dyn Transport) {
        match event {
            SessionEvent::Opened => self.on_open(transport),
            SessionEvent::Frame(frame) => route(self, &frame),
            SessionEvent::Closed { code, reason } => {
                info!(code, %reason, "connection closed");
                self.on_close();
            }
            SessionEvent::Errored(detail) => warn!(%detail, "connection error"),
        }
    }

    fn on_open(&mut self, transport: &dyn Transport) {
        info!("connected");
        self.view.on_connected();
        self.send(transport, ClientMessage::GetLobbies);
        if let Some(name) = self.identity.name.clone() {
            self.send(transport, ClientMessage::PlayerName { name });
        }
    }

    fn on_close(&mut self) {
        self.view.on_disconnected();
        self.identity.player_id = None;
    }

    pub(crate) fn apply_lobby_update(&mut self, update: LobbyUpdate) {
        let previously_known = self.lobbies.contains(&update.lobby_id);
        let summary = self.lobbies.upsert(update);
        let member = self
            .identity
            .membership(summary, self.view.joined() == Some(summary.lobby_id.as_str()));
        self.view.on_lobby_summary(summary, member, previously_known);
    }

    pub(crate) fn apply_lobby_list(&mut self, lobbies: Vec<LobbyUpdate>) {
        debug!(count = lobbies.len(), "lobby roster");
        for update in lobbies {
            self.apply_lobby_update(update);
        }
        self.view.on_roster();
    }

    pub(crate) fn apply_game_state(&mut self, state: GameState) {
        if self.view.mode() != ViewMode::Game {
            debug!(mode = self.view.mode().as_str(), "game state ahead of view");
        }
        self.game.replace(state);
    }

    pub(crate) fn apply_welcome(&mut self, player_id: String) {
        info!(%player_id, "assigned player id");
        self.identity.player_id = Some(player_id);
    }

    /// Readiness guard in front of every outbound command.
    fn send(&self, transport: &dyn Transport, message: ClientMessage) -> bool {
        if !transport.is_open() {
            debug!(kind = message.kind(), "not connected, command dropped");
            return false;
        }
        match transport.send(&message) {
            Ok(()) => true,
            Err(e) => {
                warn!(kind = message.kind(), error = %e, "failed to send command");
                false
            }
        }
    }

    /// Resend the current intent. Called on the fixed input tick; checks the
    /// transport first so a long outage does not log a line per tick.
    pub fn tick_input(&self, transport: &dyn Transport) -> bool {
        transport.is_open() && self.send(transport, self.input.command())
    }

    pub fn steer(&mut self, direction: Direction) {
        self.input.press(direction);
    }

    pub fn create_lobby(&mut self, transport: &dyn Transport) -> bool {
        if self.view.joined().is_some() {
            debug!("already in a lobby");
            return false;
        }
        let sent = self.send(transport, ClientMessage::NewLobby);
        if sent {
            self.view.request_create();
        }
        sent
    }

    pub fn join_lobby(&mut self, lobby_id: &str, transport: &dyn Transport) -> bool {
        if self.view.joined().is_some() {
            debug!("already in a lobby");
            return false;
        }
        let sent = self.send(
            transport,
            ClientMessage::JoinLobby {
                lobby_id: lobby_id.to_string(),
            },
        );
        if sent {
            self.view.request_join(lobby_id.to_string());
        }
        sent
    }

    /// Join the n-th lobby of [`LobbyRegistry::ordered`].
    pub fn join_slot(&mut self, slot: usize, transport: &dyn Transport) -> bool {
        let Some(lobby_id) = self.lobbies.ordered().get(slot).map(|l| l.lobby_id.clone()) else {
            return false;
        };
        self.join_lobby(&lobby_id, transport)
    }

    /// Remember the name (for later reconnects) and announce it if connected.
    pub fn set_name(&mut self, name: &str, transport: &dyn Transport) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.identity.name = Some(name.to_string());
        self.send(
            transport,
            ClientMessage::PlayerName {
                name: name.to_string(),
            },
        )
    }

    pub fn toggle_ready(&mut self, transport: &dyn Transport) -> bool {
        if self.view.mode() != ViewMode::Lobby {
            return false;
        }
        self.send(transport, ClientMessage::PlayerReady)
    }

    /// Key pressed. Steering always applies; action keys only on the first
    /// press and only in the view they belong to.
    pub fn key_down(&mut self, key: &str, repeat: bool, transport: &dyn Transport) {
        let Some(action) = KeyAction::from_key(key) else {
            return;
        };
        match action {
            KeyAction::Turn(direction) => self.input.press(direction),
            _ if repeat => {}
            KeyAction::NewLobby if self.in_lobby_browser() => {
                self.create_lobby(transport);
            }
            KeyAction::JoinSlot(slot) if self.in_lobby_browser() => {
                self.join_slot(slot, transport);
            }
            KeyAction::Ready => {
                self.toggle_ready(transport);
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(KeyAction::Turn(direction)) = KeyAction::from_key(key) {
            self.input.release(direction);
        }
    }

    fn in_lobby_browser(&self) -> bool {
        self.view.is_connected() && matches!(self.view.mode(), ViewMode::Menu | ViewMode::LobbyList)
    }
}
