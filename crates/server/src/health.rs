use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use emojibot_core::{config::PreferenceBackend, PreferenceStore};
use serde::Serialize;

const PROBE_USER_ID: &str = "health-probe";

#[derive(Clone)]
pub struct HealthState {
    backend: PreferenceBackend,
    preferences: Arc<dyn PreferenceStore>,
}

impl HealthState {
    pub fn new(backend: PreferenceBackend, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self { backend, preferences }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub preference_store: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let preference_store = preference_check(&state).await;
    let ready = preference_store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "emojibot-server accepting slack callbacks".to_string(),
        },
        preference_store,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn preference_check(state: &HealthState) -> HealthCheck {
    let backend = state.backend.as_str();
    match state.preferences.find_style(PROBE_USER_ID).await {
        Ok(_) => HealthCheck {
            status: "ready",
            detail: format!("{backend} store lookup succeeded"),
        },
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("{backend} store lookup failed: {error}"),
        },
    }
}
