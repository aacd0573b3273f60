// Runtime configuration for the station, sourced from the environment.

use std::env;
use std::time::Duration;

pub const TELEMETRY_WS_PATH: &str = "/api/v1/status/ws";
pub const CHAT_WS_PATH: &str = "/api/v1/chat/ws";
pub const DEFAULT_RETRY_SECS: u64 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct StationConfig {
    /// HTTP base of the drone control backend.
    pub drone_http_base: String,
    /// WebSocket base of the drone control backend.
    pub drone_ws_base: String,
    /// HTTP base of the AI chat service.
    pub chat_http_base: String,
    /// WebSocket base of the AI chat service.
    pub chat_ws_base: String,
    /// Fixed delay between telemetry reconnect attempts.
    pub retry_delay: Duration,
    /// Per-request timeout for the REST clients.
    pub request_timeout: Duration,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            drone_http_base: "http://127.0.0.1:8000".to_string(),
            drone_ws_base: "ws://127.0.0.1:8000".to_string(),
            chat_http_base: "http://127.0.0.1:8001".to_string(),
            chat_ws_base: "ws://127.0.0.1:8001".to_string(),
            retry_delay: Duration::from_secs(DEFAULT_RETRY_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let retry_secs = env::var("TELEMETRY_RETRY_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_SECS);
        let timeout_secs = env::var("COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            drone_http_base: base_var("DRONE_API_URL", defaults.drone_http_base),
            drone_ws_base: base_var("DRONE_WS_URL", defaults.drone_ws_base),
            chat_http_base: base_var("CHAT_API_URL", defaults.chat_http_base),
            chat_ws_base: base_var("CHAT_WS_URL", defaults.chat_ws_base),
            retry_delay: Duration::from_secs(retry_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Full URL of the telemetry streaming endpoint.
    pub fn telemetry_endpoint(&self) -> String {
        format!("{}{}", self.drone_ws_base, TELEMETRY_WS_PATH)
    }

    /// Full URL of the chat socket for a given session.
    pub fn chat_socket_endpoint(&self, session_id: &str) -> String {
        format!("{}{}/{}", self.chat_ws_base, CHAT_WS_PATH, session_id)
    }
}

fn base_var(name: &str, default: String) -> String {
    match env::var(name) {
        Ok(value) => value.trim_end_matches('/').to_string(),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_join_cleanly() {
        let config = StationConfig::default();
        assert_eq!(
            config.telemetry_endpoint(),
            "ws://127.0.0.1:8000/api/v1/status/ws"
        );
        assert_eq!(
            config.chat_socket_endpoint("abc"),
            "ws://127.0.0.1:8001/api/v1/chat/ws/abc"
        );
    }

    #[test]
    fn default_timing() {
        let config = StationConfig::default();
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
