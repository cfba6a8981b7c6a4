use flightdeck_api::{mail::LogEmailService, Airline};
use flightdeck_core::SystemClock;
use flightdeck_store::AirlineConfig;
use futures_util::StreamExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightdeck_api=debug,flightdeck_ops=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AirlineConfig::load()?;
    tracing::info!("Loaded config: {:?}", config);

    let mut airline = Airline::start(config, Arc::new(SystemClock), Arc::new(LogEmailService))?;
    let mut alerts = airline.audio_alerts();
    let mut display = airline.information_display();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(alert) = alerts.next() => tracing::info!("Audio alert: {:?}", alert),
            Ok(()) = display.changed() => {
                let board = display.borrow_and_update().clone();
                tracing::info!("Departures: {}", serde_json::to_string(&board)?);
            }
            _ = &mut ctrl_c => break,
        }
    }

    airline.shutdown().await;
    Ok(())
}
