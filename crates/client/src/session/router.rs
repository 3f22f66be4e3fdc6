// Message router - decode one inbound frame and hand it to the session
use protocol::ServerMessage;
use tracing::{debug, warn};

use super::Session;

/// Decode `frame` and apply it. Malformed frames and unknown kinds are
/// dropped; nothing here can fail the session.
pub fn route(session: &mut Session, frame: &str) {
    let message = match ServerMessage::decode(frame) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, len = frame.len(), "dropping malformed frame");
            return;
        }
    };

    match message {
        ServerMessage::LobbyUpdate(update) => session.apply_lobby_update(update),
        ServerMessage::LobbyList(lobbies) => session.apply_lobby_list(lobbies),
        ServerMessage::GameState(state) => session.apply_game_state(state),
        ServerMessage::Welcome { player_id } => session.apply_welcome(player_id),
        ServerMessage::Unknown(kind) => debug!(%kind, "ignoring unknown message"),
    }
}
