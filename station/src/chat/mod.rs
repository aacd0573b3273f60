// Client for the AI assistant service: REST message/session calls plus the
// per-session chat socket. The socket only counts as connected once the
// transport open has succeeded; no connected event is synthesized client-side.

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};
use uuid::Uuid;

use skylink_core::model::{ChatEvent, ChatRequest, ChatResponse, Envelope};

use crate::config::StationConfig;
use crate::error::StationError;

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct ChatClient {
    http: reqwest::Client,
    config: StationConfig,
    session_id: Option<String>,
}

impl ChatClient {
    pub fn new(config: &StationConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
            session_id: None,
        })
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Sends one message over REST and retains the session id the service
    /// assigns so the conversation continues across calls.
    pub async fn send_message(&mut self, message: &str) -> Result<ChatResponse, StationError> {
        let request = ChatRequest {
            message: message.to_string(),
            session_id: self.session_id.clone(),
        };
        let url = format!("{}/api/v1/chat/message", self.config.chat_http_base);
        let response = self.http.post(url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.detail);
            return Err(StationError::Rejected { status, detail });
        }
        let response: ChatResponse = response.json().await?;
        self.session_id = Some(response.session_id.clone());
        Ok(response)
    }

    /// Clears the conversation history server-side and forgets the session.
    /// A no-op when no session exists yet.
    pub async fn clear_session(&mut self) -> Result<(), StationError> {
        let Some(session_id) = self.session_id.as_deref() else {
            return Ok(());
        };
        let url = format!(
            "{}/api/v1/chat/session/{}",
            self.config.chat_http_base, session_id
        );
        let response = self.http.delete(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.detail);
            return Err(StationError::Rejected { status, detail });
        }
        // Forget the session only once the server has dropped it; a failed
        // delete leaves the conversation resumable.
        self.session_id = None;
        Ok(())
    }

    /// Opens the chat socket for the current session, minting a fresh session
    /// id when none exists yet.
    pub async fn connect_socket(&mut self) -> Result<ChatSocket, StationError> {
        let session_id = self
            .session_id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        let endpoint = self.config.chat_socket_endpoint(&session_id);
        let (connection, _) = connect_async(endpoint.as_str()).await?;
        info!(%session_id, "chat socket connected");
        Ok(ChatSocket { connection })
    }
}

pub struct ChatSocket {
    connection: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ChatSocket {
    pub async fn send(&mut self, message: &str) -> Result<(), StationError> {
        let frame = serde_json::json!({ "message": message });
        self.connection.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Next decoded event, or None once the server closes the socket.
    /// Undecodable frames are skipped, not surfaced.
    pub async fn next_event(&mut self) -> Result<Option<ChatEvent>, StationError> {
        while let Some(frame) = self.connection.next().await {
            match frame? {
                Message::Text(text) => match serde_json::from_str::<Envelope>(&text) {
                    Ok(envelope) => return Ok(Some(ChatEvent::from_envelope(envelope))),
                    Err(err) => warn!(?err, "skipping undecodable chat frame"),
                },
                Message::Ping(payload) => {
                    self.connection.send(Message::Pong(payload)).await?;
                }
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    pub async fn close(mut self) -> Result<(), StationError> {
        self.connection.close(None).await?;
        Ok(())
    }
}
