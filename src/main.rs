//! Nuru Clock binary entrypoint: load config, connect to the game host, serve clock actions.

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nuru_clock::{
    config::AppConfig,
    services::websocket_service,
    state::{AppState, TimezoneSet},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load().context("loading configuration")?;
    let timezones = TimezoneSet::new();
    info!(
        uri = %config.websocket_uri,
        game = %config.game_title,
        timezones = timezones.len(),
        "starting clock client"
    );

    let state = AppState::new(config, timezones);

    tokio::select! {
        outcome = websocket_service::run(state) => {
            if let Err(err) = &outcome {
                error!(error = %err, "clock client stopped");
            }
            outcome.context("running clock client")?;
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
