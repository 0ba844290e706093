use std::sync::Arc;

use emojibot_core::{
    config::{AppConfig, PreferenceBackend},
    PreferenceStore,
};
use emojibot_db::{connect, migrations, DbPool, InMemoryPreferenceStore, SqlPreferenceStore};
use emojibot_slack::{
    bot_dispatcher, client::WebApiClient, EventDispatcher, RequestVerifier, SlackApiError,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub preferences: Arc<dyn PreferenceStore>,
    pub db_pool: Option<DbPool>,
    pub dispatcher: Arc<EventDispatcher>,
    pub verifier: RequestVerifier,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("slack web api client could not be built: {0}")]
    SlackClient(#[source] SlackApiError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        preference_backend = ?config.preferences.backend,
        "starting application bootstrap"
    );

    let (preferences, db_pool) = preference_store(&config).await?;
    let client = WebApiClient::new(&config.slack).map_err(BootstrapError::SlackClient)?;
    let dispatcher = bot_dispatcher(Arc::new(client), preferences.clone());
    info!(
        event_name = "system.bootstrap.dispatcher_ready",
        correlation_id = "bootstrap",
        handler_count = dispatcher.handler_count(),
        "slack event handlers registered"
    );

    Ok(Application {
        verifier: RequestVerifier::new(config.slack.signing_secret.clone()),
        config,
        preferences,
        db_pool,
        dispatcher: Arc::new(dispatcher),
    })
}

async fn preference_store(
    config: &AppConfig,
) -> Result<(Arc<dyn PreferenceStore>, Option<DbPool>), BootstrapError> {
    match config.preferences.backend {
        PreferenceBackend::Memory => Ok((Arc::new(InMemoryPreferenceStore::new()), None)),
        PreferenceBackend::Sqlite => {
            let db_pool =
                connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
            info!(
                event_name = "system.bootstrap.database_connected",
                correlation_id = "bootstrap",
                "database connection established"
            );

            migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
            info!(
                event_name = "system.bootstrap.migrations_applied",
                correlation_id = "bootstrap",
                "database migrations applied"
            );

            Ok((Arc::new(SqlPreferenceStore::new(db_pool.clone())), Some(db_pool)))
        }
    }
}
