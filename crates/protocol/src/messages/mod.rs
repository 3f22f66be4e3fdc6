//! Message definitions for the curve protocol.
//!
//! Every frame is a JSON object tagged by a `type` field. This module holds
//! the types shared by both directions; `server` and `client` hold the two
//! message enums.

mod client;
mod server;

pub use client::*;
pub use server::*;

use serde::{Deserialize, Deserializer, Serialize};

/// Steering intent. The server treats every `player_input` as a level, so
/// `None` actively means "go straight".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::None => "none",
        }
    }
}

/// Lobby lifecycle as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LobbyStatus {
    #[default]
    Waiting,
    Countdown,
    Playing,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl LobbyStatus {
    pub fn label(self) -> &'static str {
        match self {
            LobbyStatus::Waiting => "waiting",
            LobbyStatus::Countdown => "countdown",
            LobbyStatus::Playing => "playing",
            LobbyStatus::Unknown => "unknown",
        }
    }
}

/// Ids arrive as strings from some servers and as integers from others.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Integer(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Integer(n) => n.to_string(),
    })
}

/// Keeps an explicit `null` apart from an absent field: absent stays `None`
/// (via `#[serde(default)]`), `null` becomes `Some(None)`.
pub(crate) fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
