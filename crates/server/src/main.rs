mod bootstrap;
mod health;
mod ingress;

use std::{future::IntoFuture, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use emojibot_core::config::{AppConfig, LoadOptions};
use tokio::sync::Notify;

use crate::{bootstrap::Application, health::HealthState, ingress::IngressState};

fn init_logging(config: &AppConfig) {
    use emojibot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

fn app_router(app: &Application) -> Router {
    let ingress = IngressState::new(app.dispatcher.clone(), app.verifier.clone());
    let health = HealthState::new(app.config.preferences.backend, app.preferences.clone());
    ingress::router(ingress).merge(health::router(health))
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let address = app.config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "Slack app running on {address}"
    );

    let shutdown_requested = Arc::new(Notify::new());
    let signal = {
        let shutdown_requested = shutdown_requested.clone();
        async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %error, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            shutdown_requested.notify_one();
        }
    };

    let server =
        axum::serve(listener, app_router(&app)).with_graceful_shutdown(signal).into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = shutdown_requested.notified() => {
            tracing::info!(
                event_name = "system.server.stopping",
                correlation_id = "shutdown",
                grace_secs = app.config.server.graceful_shutdown_secs,
                "draining in-flight requests"
            );
            let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result?,
                Err(_) => tracing::warn!(
                    event_name = "system.server.shutdown_timeout",
                    correlation_id = "shutdown",
                    "grace period elapsed with requests still in flight"
                ),
            }
        }
    }

    if let Some(pool) = &app.db_pool {
        pool.close().await;
    }
    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "emojibot-server stopped"
    );

    Ok(())
}
