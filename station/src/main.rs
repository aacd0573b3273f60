// Headless ground-station monitor: streams telemetry from the drone backend
// and logs samples and link transitions until interrupted.

use std::time::Duration;

use tokio::time;
use tracing::{info, warn};

use skylink_station::commands::DroneCommands;
use skylink_station::config::StationConfig;
use skylink_station::stream::TelemetryStream;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = StationConfig::from_env();
    let endpoint = config.telemetry_endpoint();
    info!(%endpoint, retry_secs = config.retry_delay.as_secs(), "starting station");

    match DroneCommands::new(&config) {
        Ok(commands) => match commands.state().await {
            Ok(state) => info!(
                battery = state.battery_level,
                armed = state.is_armed,
                flying = state.is_flying,
                "drone state snapshot"
            ),
            Err(err) => warn!(%err, "drone state unavailable"),
        },
        Err(err) => warn!(%err, "failed to build command client"),
    }

    let mut stream = TelemetryStream::new(endpoint, config.retry_delay);
    stream.start();

    let mut live = stream.live();
    tokio::spawn(async move {
        while live.changed().await.is_ok() {
            if *live.borrow() {
                info!("telemetry link up");
            } else {
                info!("telemetry link down");
            }
        }
    });

    let latest = stream.latest();
    tokio::spawn(async move {
        let mut tick = time::interval(Duration::from_secs(1));
        loop {
            tick.tick().await;
            let sample = latest.borrow().clone();
            if let Some(sample) = sample {
                info!(
                    battery = sample.battery_level,
                    armed = sample.is_armed,
                    flying = sample.is_flying,
                    x = sample.position.x,
                    y = sample.position.y,
                    z = sample.position.z,
                    yaw = sample.attitude.yaw,
                    "telemetry inspect"
                );
            }
        }
    });

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for shutdown signal");
    }
    stream.stop();
    info!("shutting down");
}
