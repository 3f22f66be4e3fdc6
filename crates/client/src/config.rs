//! Client configuration, passed from JavaScript as a plain object.

use serde::Deserialize;
use wasm_bindgen::JsValue;

/// Browser client settings. Every field has a default, so `new CurveClient("canvas")`
/// and `new CurveClient("canvas", { reconnectDelayMs: 500 })` both work.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Explicit server address; derived from the page host when absent.
    pub server_url: Option<String>,
    /// WebSocket path on the page host.
    pub ws_path: String,
    /// Fixed delay before every reconnect attempt.
    pub reconnect_delay_ms: u32,
    /// Input resend interval.
    pub input_tick_ms: u32,
    /// Logical field size used until the server reports one.
    pub field_width: f32,
    pub field_height: f32,
    pub show_grid: bool,
    /// Display name announced on every connection open.
    pub player_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            ws_path: "/ws/game".to_string(),
            reconnect_delay_ms: 1000,
            input_tick_ms: 16,
            field_width: protocol::DEFAULT_FIELD_WIDTH,
            field_height: protocol::DEFAULT_FIELD_HEIGHT,
            show_grid: true,
            player_name: None,
        }
    }
}

impl ClientConfig {
    /// Decode the options object handed to the constructor; `undefined`/`null` mean defaults.
    pub fn from_js(value: JsValue) -> Result<Self, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_reference_client() {
        let config = ClientConfig::default();
        assert_eq!(config.ws_path, "/ws/game");
        assert_eq!(config.reconnect_delay_ms, 1000);
        assert_eq!(config.input_tick_ms, 16);
        assert_eq!((config.field_width, config.field_height), (800.0, 600.0));
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"reconnectDelayMs":250,"playerName":"ann"}"#).unwrap();
        assert_eq!(config.reconnect_delay_ms, 250);
        assert_eq!(config.player_name.as_deref(), Some("ann"));
        assert_eq!(config.input_tick_ms, 16);
        assert!(config.show_grid);
    }
}
