// Lobby registry - latest known summary per lobby id
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use protocol::{LobbyStatus, LobbyUpdate, PlayerRef};

/// Latest known state of one lobby.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LobbySummary {
    pub lobby_id: String,
    pub status: LobbyStatus,
    pub players: Vec<PlayerRef>,
    pub round: u32,
    pub countdown: Option<u32>,
    pub max_players: Option<u32>,
}

impl LobbySummary {
    /// Shallow merge: every field present in `update` overwrites, absent ones stay.
    pub fn merge(&mut self, update: LobbyUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(players) = update.players {
            self.players = players;
        }
        if let Some(round) = update.round {
            self.round = round;
        }
        if let Some(countdown) = update.countdown {
            self.countdown = countdown;
        }
        if let Some(max_players) = update.max_players {
            self.max_players = Some(max_players);
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn has_player_named(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    pub fn ready_count(&self) -> usize {
        self.players.iter().filter(|p| p.ready).count()
    }
}

impl From<LobbyUpdate> for LobbySummary {
    fn from(update: LobbyUpdate) -> Self {
        let mut summary = LobbySummary {
            lobby_id: update.lobby_id.clone(),
            ..Default::default()
        };
        summary.merge(update);
        summary
    }
}

/// Every lobby seen this session. Entries are never evicted.
#[derive(Debug, Default)]
pub struct LobbyRegistry {
    lobbies: HashMap<String, LobbySummary>,
}

impl LobbyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert on first sighting, merge afterwards. Returns the stored summary.
    pub fn upsert(&mut self, update: LobbyUpdate) -> &LobbySummary {
        match self.lobbies.entry(update.lobby_id.clone()) {
            Entry::Occupied(entry) => {
                let summary = entry.into_mut();
                summary.merge(update);
                summary
            }
            Entry::Vacant(entry) => entry.insert(LobbySummary::from(update)),
        }
    }

    pub fn get(&self, lobby_id: &str) -> Option<&LobbySummary> {
        self.lobbies.get(lobby_id)
    }

    pub fn contains(&self, lobby_id: &str) -> bool {
        self.lobbies.contains_key(lobby_id)
    }

    /// Summaries sorted by id: the order shown on screen and used by the
    /// numeric join shortcuts.
    pub fn ordered(&self) -> Vec<&LobbySummary> {
        let mut lobbies: Vec<_> = self.lobbies.values().collect();
        lobbies.sort_by(|a, b| a.lobby_id.cmp(&b.lobby_id));
        lobbies
    }

    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, ready: bool) -> PlayerRef {
        PlayerRef {
            id: id.to_string(),
            name: format!("player-{}", id),
            color: "#FF0000".to_string(),
            ready,
            score: 0,
        }
    }

    fn update(lobby_id: &str) -> LobbyUpdate {
        LobbyUpdate {
            lobby_id: lobby_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_sighting_is_stored_verbatim() {
        let mut registry = LobbyRegistry::new();
        let summary = registry.upsert(LobbyUpdate {
            status: Some(LobbyStatus::Countdown),
            players: Some(vec![player("a", true)]),
            round: Some(3),
            countdown: Some(Some(5)),
            max_players: Some(4),
            ..update("x")
        });
        assert_eq!(summary.status, LobbyStatus::Countdown);
        assert_eq!(summary.players.len(), 1);
        assert_eq!(summary.round, 3);
        assert_eq!(summary.countdown, Some(5));
        assert_eq!(summary.max_players, Some(4));
    }

    #[test]
    fn test_partial_first_sighting_uses_defaults() {
        let mut registry = LobbyRegistry::new();
        let summary = registry.upsert(update("x"));
        assert_eq!(summary.status, LobbyStatus::Waiting);
        assert!(summary.players.is_empty());
        assert_eq!(summary.round, 0);
        assert_eq!(summary.countdown, None);
        assert_eq!(summary.max_players, None);
    }

    #[test]
    fn test_sequence_merges_field_wise_in_receipt_order() {
        let mut registry = LobbyRegistry::new();
        registry.upsert(LobbyUpdate {
            status: Some(LobbyStatus::Waiting),
            players: Some(vec![player("a", false)]),
            round: Some(1),
            max_players: Some(6),
            ..update("x")
        });
        registry.upsert(LobbyUpdate {
            players: Some(vec![player("a", true), player("b", false)]),
            ..update("x")
        });
        registry.upsert(LobbyUpdate {
            status: Some(LobbyStatus::Countdown),
            countdown: Some(Some(3)),
            ..update("x")
        });
        registry.upsert(LobbyUpdate {
            countdown: Some(Some(2)),
            ..update("x")
        });

        let summary = registry.get("x").unwrap();
        assert_eq!(summary.status, LobbyStatus::Countdown);
        assert_eq!(summary.players, vec![player("a", true), player("b", false)]);
        assert_eq!(summary.round, 1);
        assert_eq!(summary.countdown, Some(2));
        assert_eq!(summary.max_players, Some(6));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_explicit_null_clears_countdown() {
        let mut registry = LobbyRegistry::new();
        registry.upsert(LobbyUpdate {
            countdown: Some(Some(1)),
            ..update("x")
        });
        registry.upsert(LobbyUpdate {
            status: Some(LobbyStatus::Playing),
            countdown: Some(None),
            ..update("x")
        });
        assert_eq!(registry.get("x").unwrap().countdown, None);
    }

    #[test]
    fn test_lobbies_are_independent_and_ordered_by_id() {
        let mut registry = LobbyRegistry::new();
        registry.upsert(LobbyUpdate { round: Some(2), ..update("b") });
        registry.upsert(LobbyUpdate { round: Some(1), ..update("a") });
        registry.upsert(update("c"));

        let ids: Vec<_> = registry.ordered().iter().map(|l| l.lobby_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(registry.get("b").unwrap().round, 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_membership_and_ready_count() {
        let summary = LobbySummary::from(LobbyUpdate {
            players: Some(vec![player("a", true), player("b", false)]),
            ..update("x")
        });
        assert!(summary.has_player("b"));
        assert!(!summary.has_player("c"));
        assert!(summary.has_player_named("player-a"));
        assert!(!summary.has_player_named("a"));
        assert_eq!(summary.ready_count(), 1);
    }
}
