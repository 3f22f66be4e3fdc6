// Game snapshot - the in-round world exactly as the server last described it
use std::collections::HashMap;

use glam::Vec2;
use protocol::{GameState, PlayerState};

/// Largest field side accepted from the server; anything beyond falls back
/// to the configured field.
pub const MAX_FIELD_EXTENT: f32 = 10_000.0;

/// Latest `game_state`, replaced wholesale on every message. Nothing here is
/// simulated or interpolated on the client.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    players: HashMap<String, PlayerState>,
    field: Option<Vec2>,
}

impl GameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new snapshot in one assignment.
    pub fn replace(&mut self, state: GameState) {
        *self = Self::from(state);
    }

    pub fn player(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// Players sorted by id so the paint order is stable between frames.
    pub fn ordered_players(&self) -> Vec<&PlayerState> {
        let mut players: Vec<_> = self.players.values().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn alive_count(&self) -> usize {
        self.players.values().filter(|p| p.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Field size reported by the server, if any.
    pub fn field_size(&self) -> Option<Vec2> {
        self.field
    }
}

impl From<GameState> for GameSnapshot {
    fn from(state: GameState) -> Self {
        let field = match (state.width, state.height) {
            (Some(w), Some(h)) if plausible_extent(w) && plausible_extent(h) => Some(Vec2::new(w, h)),
            _ => None,
        };
        Self {
            players: state.players,
            field,
        }
    }
}

fn plausible_extent(side: f32) -> bool {
    side.is_finite() && side > 0.0 && side <= MAX_FIELD_EXTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, alive: bool) -> PlayerState {
        PlayerState {
            id: id.to_string(),
            color: "#00FF00".to_string(),
            x: 1.0,
            y: 2.0,
            curve: vec![(0.0, 0.0), (1.0, 2.0)],
            alive,
        }
    }

    #[test]
    fn test_replace_drops_players_missing_from_new_state() {
        let mut snapshot = GameSnapshot::new();
        let mut state = GameState::default();
        state.players.insert("a".into(), player("a", true));
        state.players.insert("b".into(), player("b", false));
        snapshot.replace(state);
        assert_eq!(snapshot.player_count(), 2);
        assert_eq!(snapshot.alive_count(), 1);

        let mut state = GameState::default();
        state.players.insert("b".into(), player("b", true));
        snapshot.replace(state);
        assert!(snapshot.player("a").is_none());
        assert_eq!(snapshot.alive_count(), 1);
    }

    #[test]
    fn test_field_size_needs_both_dimensions() {
        let snapshot = GameSnapshot::from(GameState {
            width: Some(1000.0),
            height: Some(500.0),
            ..Default::default()
        });
        assert_eq!(snapshot.field_size(), Some(Vec2::new(1000.0, 500.0)));

        let snapshot = GameSnapshot::from(GameState {
            width: Some(1000.0),
            ..Default::default()
        });
        assert_eq!(snapshot.field_size(), None);
    }

    #[test]
    fn test_implausible_field_size_is_ignored() {
        for (width, height) in [
            (1e12, 600.0),
            (f32::INFINITY, 600.0),
            (800.0, f32::NAN),
            (-800.0, 600.0),
            (MAX_FIELD_EXTENT + 1.0, 600.0),
        ] {
            let snapshot = GameSnapshot::from(GameState {
                width: Some(width),
                height: Some(height),
                ..Default::default()
            });
            assert_eq!(snapshot.field_size(), None, "{}x{}", width, height);
        }

        let snapshot = GameSnapshot::from(GameState {
            width: Some(MAX_FIELD_EXTENT),
            height: Some(MAX_FIELD_EXTENT),
            ..Default::default()
        });
        assert_eq!(snapshot.field_size(), Some(Vec2::splat(MAX_FIELD_EXTENT)));
    }

    #[test]
    fn test_players_are_ordered_by_id() {
        let mut state = GameState::default();
        for id in ["c", "a", "b"] {
            state.players.insert(id.into(), player(id, true));
        }
        let snapshot = GameSnapshot::from(state);
        let ids: Vec<_> = snapshot.ordered_players().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
