//! Headless client configuration, read from `curve.toml`.

use std::path::Path;

use protocol::Direction;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Full WebSocket URL of the game endpoint.
    pub server_url: String,
    /// Fixed delay before every reconnect attempt.
    pub reconnect_delay_ms: u32,
    /// `player_input` resend interval.
    pub input_tick_ms: u32,
    /// Name announced on every connection open.
    pub player_name: Option<String>,
    /// Join the first listed lobby, or create one when the list is empty.
    pub auto_join: bool,
    /// Ready up once per lobby round.
    pub auto_ready: bool,
    /// Intent held for the whole session.
    pub steer: Direction,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8000/ws/game".to_string(),
            reconnect_delay_ms: 1000,
            input_tick_ms: 16,
            player_name: Some("headless".to_string()),
            auto_join: true,
            auto_ready: true,
            steer: Direction::None,
        }
    }
}

impl HeadlessConfig {
    /// Load from `path`, writing the defaults there first if it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: HeadlessConfig = toml::from_str(
            r#"
            server_url = "ws://10.0.0.5:9000/ws/game"
            steer = "left"
            auto_ready = false
            "#,
        )
        .unwrap();
        assert_eq!(config.server_url, "ws://10.0.0.5:9000/ws/game");
        assert_eq!(config.steer, Direction::Left);
        assert!(!config.auto_ready);
        assert!(config.auto_join);
        assert_eq!(config.reconnect_delay_ms, 1000);
        assert_eq!(config.input_tick_ms, 16);
    }

    #[test]
    fn test_unknown_steer_is_rejected() {
        assert!(toml::from_str::<HeadlessConfig>(r#"steer = "up""#).is_err());
    }

    #[test]
    fn test_load_writes_defaults_when_missing() {
        let path = std::env::temp_dir().join(format!("curve-headless-{}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = HeadlessConfig::load(&path).unwrap();
        assert_eq!(config.server_url, HeadlessConfig::default().server_url);
        assert!(path.exists());

        std::fs::write(&path, "input_tick_ms = 50\n").unwrap();
        assert_eq!(HeadlessConfig::load(&path).unwrap().input_tick_ms, 50);
        std::fs::remove_file(&path).unwrap();
    }
}
