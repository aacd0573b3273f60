// REST client for the drone control and status endpoints.
// Commands are one-shot: a failure is surfaced to the caller once, no retry.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use skylink_core::model::{
    Attitude, CommandAck, GotoRequest, MoveRequest, Position, TakeoffRequest, TelemetrySample,
    Vector3,
};

use crate::config::StationConfig;
use crate::error::StationError;

/// Rejection body the backend sends alongside a 4xx status.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct DroneCommands {
    http: reqwest::Client,
    base: String,
}

impl DroneCommands {
    pub fn new(config: &StationConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base: config.drone_http_base.clone(),
        })
    }

    pub async fn arm(&self) -> Result<CommandAck, StationError> {
        self.post_empty("arm").await
    }

    pub async fn disarm(&self) -> Result<CommandAck, StationError> {
        self.post_empty("disarm").await
    }

    pub async fn takeoff(&self, altitude: f32) -> Result<CommandAck, StationError> {
        self.post_json("takeoff", &TakeoffRequest { altitude }).await
    }

    pub async fn land(&self) -> Result<CommandAck, StationError> {
        self.post_empty("land").await
    }

    pub async fn move_by(
        &self,
        velocity: Vector3,
        duration: Option<f32>,
    ) -> Result<CommandAck, StationError> {
        self.post_json("move", &MoveRequest { velocity, duration })
            .await
    }

    pub async fn goto(&self, position: Vector3, speed: f32) -> Result<CommandAck, StationError> {
        self.post_json("goto", &GotoRequest { position, speed }).await
    }

    pub async fn hover(&self) -> Result<CommandAck, StationError> {
        self.post_empty("hover").await
    }

    pub async fn emergency_stop(&self) -> Result<CommandAck, StationError> {
        self.post_empty("emergency").await
    }

    pub async fn state(&self) -> Result<TelemetrySample, StationError> {
        self.get_status("state").await
    }

    pub async fn position(&self) -> Result<Position, StationError> {
        self.get_status("position").await
    }

    pub async fn attitude(&self) -> Result<Attitude, StationError> {
        self.get_status("attitude").await
    }

    async fn post_empty(&self, operation: &str) -> Result<CommandAck, StationError> {
        debug!(operation, "sending control command");
        let url = format!("{}/api/v1/control/{}", self.base, operation);
        decode(self.http.post(url).send().await?).await
    }

    async fn post_json<B: Serialize>(
        &self,
        operation: &str,
        body: &B,
    ) -> Result<CommandAck, StationError> {
        debug!(operation, "sending control command");
        let url = format!("{}/api/v1/control/{}", self.base, operation);
        decode(self.http.post(url).json(body).send().await?).await
    }

    async fn get_status<T: DeserializeOwned>(&self, field: &str) -> Result<T, StationError> {
        let url = format!("{}/api/v1/status/{}", self.base, field);
        decode(self.http.get(url).send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StationError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.detail);
        Err(StationError::Rejected { status, detail })
    }
}
