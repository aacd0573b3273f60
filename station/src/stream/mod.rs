// Telemetry stream client with automatic reconnect.
// Invariants: one task per started client owns the connection and the retry
// timer; at most one retry is pending; only stop() ends the retry loop.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use skylink_core::decode::{decode_payload, StreamPayload};
use skylink_core::link::{LinkEvent, LinkTracker};
use skylink_core::model::TelemetrySample;

type WsConnection = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Maintains a live connection to the telemetry endpoint, keeps the latest
/// decoded sample, and recovers from connection loss without caller
/// intervention. Owned by exactly one consumer; dropping it stops the stream.
pub struct TelemetryStream {
    endpoint: String,
    retry_delay: Duration,
    latest_tx: watch::Sender<Option<TelemetrySample>>,
    live_tx: watch::Sender<bool>,
    run_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl TelemetryStream {
    pub fn new(endpoint: impl Into<String>, retry_delay: Duration) -> Self {
        let (latest_tx, _) = watch::channel(None);
        let (live_tx, _) = watch::channel(false);
        let (run_tx, _) = watch::channel(false);
        Self {
            endpoint: endpoint.into(),
            retry_delay,
            latest_tx,
            live_tx,
            run_tx,
            task: None,
        }
    }

    /// Idempotent: spawns the stream task unless one is already running.
    /// Returns immediately; progress is observed through `live()`/`latest()`.
    pub fn start(&mut self) {
        if let Some(task) = &self.task {
            if !task.is_finished() {
                // Task is connecting, connected, or parked after a stop.
                // Raising the flag revives a parked task; re-sending true
                // while already true would wake the task and abort an
                // in-progress connect attempt, so guard on the current value.
                if !*self.run_tx.borrow() {
                    self.run_tx.send_replace(true);
                }
                return;
            }
        }
        self.run_tx.send_replace(true);
        let endpoint = self.endpoint.clone();
        let retry_delay = self.retry_delay;
        let latest_tx = self.latest_tx.clone();
        let live_tx = self.live_tx.clone();
        let run_rx = self.run_tx.subscribe();
        self.task = Some(tokio::spawn(async move {
            stream_task(endpoint, retry_delay, latest_tx, live_tx, run_rx).await;
        }));
    }

    /// Closes any active connection and cancels any pending retry. Safe to
    /// call repeatedly or before the first `start()`.
    pub fn stop(&mut self) {
        self.run_tx.send_replace(false);
    }

    /// Latest decoded sample; replaced on every valid message, retained across
    /// decode failures and reconnects.
    pub fn latest(&self) -> watch::Receiver<Option<TelemetrySample>> {
        self.latest_tx.subscribe()
    }

    /// Liveness flag: true only while the connection is open.
    pub fn live(&self) -> watch::Receiver<bool> {
        self.live_tx.subscribe()
    }

    pub fn latest_sample(&self) -> Option<TelemetrySample> {
        self.latest_tx.borrow().clone()
    }

    pub fn is_live(&self) -> bool {
        *self.live_tx.borrow()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Drop for TelemetryStream {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn stream_task(
    endpoint: String,
    retry_delay: Duration,
    latest_tx: watch::Sender<Option<TelemetrySample>>,
    live_tx: watch::Sender<bool>,
    mut run_rx: watch::Receiver<bool>,
) {
    let mut tracker = LinkTracker::new();
    loop {
        if !*run_rx.borrow() {
            tracker.apply(LinkEvent::Stopped);
            live_tx.send_replace(false);
            // Park until restarted rather than exiting: a stop followed by an
            // immediate start must always revive the stream, even when the
            // start lands between our flag read and a return. The task only
            // ends once the owning client is dropped.
            if run_rx.wait_for(|run| *run).await.is_err() {
                break;
            }
        }

        tracker.apply(LinkEvent::ConnectRequested);
        debug!(%endpoint, "opening telemetry stream");
        tokio::select! {
            result = connect_async(endpoint.as_str()) => match result {
                Ok((connection, _)) => {
                    tracker.apply(LinkEvent::Opened);
                    live_tx.send_replace(tracker.is_live());
                    info!(%endpoint, "telemetry stream connected");
                    let stopped = run_connection(connection, &latest_tx, &mut run_rx).await;
                    tracker.apply(if stopped { LinkEvent::Stopped } else { LinkEvent::Lost });
                    live_tx.send_replace(tracker.is_live());
                    info!("telemetry stream disconnected");
                    if stopped {
                        continue;
                    }
                }
                Err(err) => {
                    warn!(?err, %endpoint, "telemetry connect failed");
                    tracker.apply(LinkEvent::Lost);
                }
            },
            _ = run_rx.changed() => continue,
        }

        if !tracker.retry_armed() {
            continue;
        }
        // Exactly one retry pending from here until it fires or stop wins.
        tokio::select! {
            _ = time::sleep(retry_delay) => {
                tracker.apply(LinkEvent::RetryElapsed);
            }
            _ = run_rx.changed() => {}
        }
    }
    live_tx.send_replace(false);
}

/// Drives one open connection until it closes, errors, or stop is requested.
/// Returns true when the exit was caused by stop().
async fn run_connection(
    mut connection: WsConnection,
    latest_tx: &watch::Sender<Option<TelemetrySample>>,
    run_rx: &mut watch::Receiver<bool>,
) -> bool {
    loop {
        tokio::select! {
            inbound = connection.next() => match inbound {
                Some(Ok(Message::Text(text))) => match decode_payload(&text) {
                    Some(StreamPayload::Sample(sample)) => {
                        latest_tx.send_replace(Some(sample));
                    }
                    Some(StreamPayload::Offline { error }) => {
                        debug!(?error, "backend reports drone offline");
                    }
                    None => {
                        warn!(len = text.len(), "dropping undecodable telemetry payload");
                    }
                },
                Some(Ok(Message::Ping(payload))) => {
                    if connection.send(Message::Pong(payload)).await.is_err() {
                        return false;
                    }
                }
                Some(Ok(Message::Close(_))) => return false,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(?err, "telemetry stream error");
                    return false;
                }
                None => return false,
            },
            _ = run_rx.changed() => {
                if !*run_rx.borrow() {
                    let _ = connection.close(None).await;
                    return true;
                }
            }
        }
    }
}
