//! Server -> Client message decoding.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::{explicit_null, string_or_number, LobbyStatus};
use crate::{Point, ProtocolError};

/// Lobby-scope player identity, as listed in a lobby summary.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PlayerRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub color: String,
    pub ready: bool,
    pub score: i64,
}

/// Body of a `lobby_update` (and of each `lobby_list` entry).
///
/// Every field except the id is optional: servers may send full summaries or
/// only the fields that changed.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyUpdate {
    #[serde(deserialize_with = "string_or_number")]
    pub lobby_id: String,
    #[serde(default)]
    pub status: Option<LobbyStatus>,
    #[serde(default)]
    pub players: Option<Vec<PlayerRef>>,
    #[serde(default)]
    pub round: Option<u32>,
    /// `None` = absent, `Some(None)` = explicitly cleared.
    #[serde(default, deserialize_with = "explicit_null")]
    pub countdown: Option<Option<u32>>,
    #[serde(default)]
    pub max_players: Option<u32>,
}

/// In-round state of one player.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerState {
    /// Filled from the mapping key when the server omits it.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub color: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub curve: Vec<Point>,
    #[serde(default = "alive_by_default")]
    pub alive: bool,
}

fn alive_by_default() -> bool {
    true
}

/// Body of a `game_state` message.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub players: HashMap<String, PlayerState>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

#[derive(Deserialize)]
struct LobbyList {
    #[serde(default)]
    lobbies: Vec<LobbyUpdate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Welcome {
    #[serde(deserialize_with = "string_or_number")]
    player_id: String,
}

/// Decoded server message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Full or partial summary of one lobby.
    LobbyUpdate(LobbyUpdate),
    /// Roster of every lobby the server knows (answer to `get_lobbies`).
    LobbyList(Vec<LobbyUpdate>),
    /// Complete in-round snapshot.
    GameState(GameState),
    /// Identity of this connection.
    Welcome { player_id: String },
    /// Well-formed message of a kind this client does not handle.
    Unknown(String),
}

impl ServerMessage {
    /// Decode one text frame.
    ///
    /// Legacy spellings (`lobbyUpdate`, `lobbyList`, `gameState`) are
    /// accepted, and an untagged object carrying `players` is a game state.
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(frame)?;
        let Value::Object(mut fields) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err(ProtocolError::InvalidType),
            None if fields.contains_key("players") => {
                let state = serde_json::from_value(Value::Object(fields))?;
                return Ok(Self::GameState(fill_player_ids(state)));
            }
            None => return Err(ProtocolError::MissingType),
        };

        let body = Value::Object(fields);
        let message = match kind.as_str() {
            "lobby_update" | "lobbyUpdate" => Self::LobbyUpdate(serde_json::from_value(body)?),
            "lobby_list" | "lobbyList" => {
                let list: LobbyList = serde_json::from_value(body)?;
                Self::LobbyList(list.lobbies)
            }
            "game_state" | "gameState" => {
                Self::GameState(fill_player_ids(serde_json::from_value(body)?))
            }
            "welcome" => {
                let welcome: Welcome = serde_json::from_value(body)?;
                Self::Welcome { player_id: welcome.player_id }
            }
            _ => Self::Unknown(kind),
        };
        Ok(message)
    }

    /// Short name for logging.
    pub fn kind(&self) -> &str {
        match self {
            ServerMessage::LobbyUpdate(_) => "lobby_update",
            ServerMessage::LobbyList(_) => "lobby_list",
            ServerMessage::GameState(_) => "game_state",
            ServerMessage::Welcome { .. } => "welcome",
            ServerMessage::Unknown(kind) => kind,
        }
    }
}

fn fill_player_ids(mut state: GameState) -> GameState {
    for (key, player) in state.players.iter_mut() {
        if player.id.is_empty() {
            player.id = key.clone();
        }
    }
    state
}
