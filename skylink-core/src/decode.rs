// Telemetry stream payload decoding.
// Invariants: a payload that fails to decode is dropped, never partially applied.

use serde::Deserialize;

use crate::model::TelemetrySample;

/// One inbound frame on the telemetry stream. While the backend has no upstream
/// sim link it keeps the socket open and emits offline notices instead of
/// samples; those must not be mistaken for connection loss.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamPayload {
    Sample(TelemetrySample),
    Offline { error: Option<String> },
}

#[derive(Deserialize)]
struct OfflineNotice {
    #[serde(default)]
    error: Option<String>,
    is_connected: bool,
}

pub fn decode_payload(text: &str) -> Option<StreamPayload> {
    if let Ok(sample) = serde_json::from_str::<TelemetrySample>(text) {
        return Some(StreamPayload::Sample(sample));
    }
    match serde_json::from_str::<OfflineNotice>(text) {
        Ok(notice) if !notice.is_connected => Some(StreamPayload::Offline {
            error: notice.error,
        }),
        _ => None,
    }
}
