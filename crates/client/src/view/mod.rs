// View state machine - which screen is active and which lobby is ours
use protocol::LobbyStatus;
use tracing::info;

use crate::lobby::LobbySummary;

/// Top-level UI context. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Menu,
    LobbyList,
    Lobby,
    Game,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Menu => "menu",
            ViewMode::LobbyList => "lobby-list",
            ViewMode::Lobby => "lobby",
            ViewMode::Game => "game",
        }
    }
}

/// A join or create request waiting for the server to list us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingJoin {
    Join(String),
    Create,
}

/// Projection of the last server truth onto a view mode.
///
/// Only server messages and the transport lifecycle move the mode; local
/// actions merely record a [`PendingJoin`].
#[derive(Debug, Default)]
pub struct ViewState {
    mode: ViewMode,
    connected: bool,
    joined: Option<String>,
    pending: Option<PendingJoin>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn joined(&self) -> Option<&str> {
        self.joined.as_deref()
    }

    pub fn pending(&self) -> Option<&PendingJoin> {
        self.pending.as_ref()
    }

    pub fn on_connected(&mut self) {
        self.connected = true;
    }

    /// Transport closed: back to the disconnected menu, forget the lobby.
    pub fn on_disconnected(&mut self) {
        self.connected = false;
        self.joined = None;
        self.pending = None;
        self.set_mode(ViewMode::Menu);
    }

    pub fn request_join(&mut self, lobby_id: String) {
        self.pending = Some(PendingJoin::Join(lobby_id));
    }

    pub fn request_create(&mut self) {
        self.pending = Some(PendingJoin::Create);
    }

    /// A roster arrived. Only moves the menu forward; never pulls us out of a lobby.
    pub fn on_roster(&mut self) {
        if self.joined.is_none() && matches!(self.mode, ViewMode::Menu | ViewMode::LobbyList) {
            self.set_mode(ViewMode::LobbyList);
        }
    }

    /// Apply one merged lobby summary.
    ///
    /// `member` is `Some` when the session can tell whether the summary
    /// lists us (by id, or by name while a join is pending); `previously_known` tells whether the registry had
    /// this lobby before the update.
    pub fn on_lobby_summary(&mut self, summary: &LobbySummary, member: Option<bool>, previously_known: bool) {
        match self.joined.as_deref() {
            Some(joined) if joined == summary.lobby_id => {
                if member == Some(false) {
                    info!(lobby = %summary.lobby_id, "no longer listed in lobby");
                    self.joined = None;
                    self.set_mode(ViewMode::LobbyList);
                } else {
                    self.enter(summary.status);
                }
            }
            Some(_) => {}
            None => {
                let confirmed = match member {
                    Some(is_member) => is_member,
                    None => match &self.pending {
                        Some(PendingJoin::Join(target)) => *target == summary.lobby_id,
                        Some(PendingJoin::Create) => !previously_known,
                        None => false,
                    },
                };
                if confirmed {
                    info!(lobby = %summary.lobby_id, "joined lobby");
                    self.joined = Some(summary.lobby_id.clone());
                    self.pending = None;
                    self.enter(summary.status);
                } else {
                    self.on_roster();
                }
            }
        }
    }

    fn enter(&mut self, status: LobbyStatus) {
        let mode = if status == LobbyStatus::Playing {
            ViewMode::Game
        } else {
            ViewMode::Lobby
        };
        self.set_mode(mode);
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            info!(from = self.mode.as_str(), to = mode.as_str(), "view mode changed");
            self.mode = mode;
        }
    }
}
