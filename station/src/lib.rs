// Ground-station runtime for the drone dashboard: telemetry stream client,
// control command client, chat client, and configuration.

pub mod chat;
pub mod commands;
pub mod config;
pub mod error;
pub mod stream;

pub use config::StationConfig;
pub use error::StationError;
