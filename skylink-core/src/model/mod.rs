// Core data models for telemetry samples, control commands, and chat traffic.

mod chat;
mod command;
mod sample;

pub use chat::{ChatEvent, ChatMessage, ChatRequest, ChatResponse, ChatRole, Envelope, ToolCall};
pub use command::{CommandAck, GotoRequest, MoveRequest, TakeoffRequest};
pub use sample::{Attitude, GpsFix, Position, TelemetrySample, Vector3, Velocity};
