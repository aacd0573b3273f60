// Station error types. Stream lifecycle failures never surface here; they only
// show up as the liveness flag flipping false.

use reqwest::StatusCode;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("socket transport error: {0}")]
    Socket(#[from] tungstenite::Error),

    /// The remote service answered with a non-success status. The backend puts
    /// a human-readable reason in a `detail` field when it has one.
    #[error("rejected by remote ({status}): {detail:?}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
}
