// Request and acknowledgement bodies for the drone control endpoints.

use serde::{Deserialize, Serialize};

use super::Vector3;

pub const DEFAULT_TAKEOFF_ALTITUDE_M: f32 = 10.0;
pub const DEFAULT_GOTO_SPEED_MS: f32 = 5.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TakeoffRequest {
    pub altitude: f32,
}

impl Default for TakeoffRequest {
    fn default() -> Self {
        Self {
            altitude: DEFAULT_TAKEOFF_ALTITUDE_M,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub velocity: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GotoRequest {
    pub position: Vector3,
    pub speed: f32,
}

impl Default for GotoRequest {
    fn default() -> Self {
        Self {
            position: Vector3::default(),
            speed: DEFAULT_GOTO_SPEED_MS,
        }
    }
}

/// Control endpoints answer `{"success": bool}`; emergency stop adds a message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
