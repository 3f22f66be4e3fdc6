//! Client -> Server commands.

use serde::{Deserialize, Serialize};

use super::Direction;
use crate::ProtocolError;

/// Command sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the current lobby roster (sent on every connection open).
    GetLobbies,
    /// Create a new lobby and join it.
    NewLobby,
    /// Join an existing lobby.
    JoinLobby {
        #[serde(rename = "lobbyId")]
        lobby_id: String,
    },
    /// Set the display name.
    PlayerName { name: String },
    /// Toggle ready in the current lobby.
    PlayerReady,
    /// Current steering intent, resent every input tick.
    PlayerInput { direction: Direction },
}

impl ClientMessage {
    /// Serialize to a JSON text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::GetLobbies => "get_lobbies",
            ClientMessage::NewLobby => "new_lobby",
            ClientMessage::JoinLobby { .. } => "join_lobby",
            ClientMessage::PlayerName { .. } => "player_name",
            ClientMessage::PlayerReady => "player_ready",
            ClientMessage::PlayerInput { .. } => "player_input",
        }
    }
}
