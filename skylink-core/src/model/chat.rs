// Chat traffic shared between the REST message endpoint and the chat socket.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
    Tool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub parameters: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One entry of a conversation transcript.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Raw frame envelope on the chat socket: `{type, data, timestamp}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Typed view of an inbound chat socket frame. Unrecognized types are passed
/// through rather than dropped so the panel can still render them.
#[derive(Clone, Debug)]
pub enum ChatEvent {
    StatusUpdate { status: String },
    AiReply { reply: String, tool_calls: Vec<ToolCall>, timestamp: Option<String> },
    Other { message_type: String, data: Value },
}

impl ChatEvent {
    pub fn from_envelope(envelope: Envelope) -> Self {
        match envelope.message_type.as_str() {
            "status_update" => {
                let status = envelope
                    .data
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                ChatEvent::StatusUpdate { status }
            }
            "ai_reply" => {
                let reply = envelope
                    .data
                    .get("reply")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let tool_calls = envelope
                    .data
                    .get("tool_calls")
                    .cloned()
                    .and_then(|value| serde_json::from_value(value).ok())
                    .unwrap_or_default();
                let timestamp = envelope
                    .data
                    .get("timestamp")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or(envelope.timestamp);
                ChatEvent::AiReply {
                    reply,
                    tool_calls,
                    timestamp,
                }
            }
            _ => ChatEvent::Other {
                message_type: envelope.message_type,
                data: envelope.data,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
        let role: ChatRole = serde_json::from_str("\"tool\"").unwrap();
        assert_eq!(role, ChatRole::Tool);
    }

    #[test]
    fn ai_reply_envelope_decodes() {
        let envelope: Envelope = serde_json::from_str(
            r#"{
                "type": "ai_reply",
                "data": {
                    "reply": "climbing to 20m",
                    "tool_calls": [{"tool": "takeoff", "parameters": {"altitude": 20}}],
                    "timestamp": "2024-05-11T09:30:01.000000"
                }
            }"#,
        )
        .unwrap();
        let ChatEvent::AiReply {
            reply,
            tool_calls,
            timestamp,
        } = ChatEvent::from_envelope(envelope)
        else {
            panic!("expected ai_reply");
        };
        assert_eq!(reply, "climbing to 20m");
        assert_eq!(tool_calls.len(), 1);
        assert_eq!(tool_calls[0].tool, "takeoff");
        assert_eq!(timestamp.as_deref(), Some("2024-05-11T09:30:01.000000"));
    }

    #[test]
    fn unknown_envelope_types_pass_through() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"type": "tool_execution", "data": {"tool": "land"}}"#)
                .unwrap();
        let ChatEvent::Other { message_type, data } = ChatEvent::from_envelope(envelope) else {
            panic!("expected passthrough");
        };
        assert_eq!(message_type, "tool_execution");
        assert_eq!(data["tool"], "land");
    }

    #[test]
    fn transcript_message_roundtrips() {
        let message = ChatMessage {
            role: ChatRole::User,
            content: "take off".to_string(),
            timestamp: None,
            tool_calls: None,
        };
        let text = serde_json::to_string(&message).unwrap();
        assert_eq!(text, r#"{"role":"user","content":"take off"}"#);
    }
}
