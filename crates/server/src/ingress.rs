use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use chrono::Utc;
use emojibot_slack::{
    commands::SlashCommandPayload,
    events::{EventContext, EventDispatcher, SlackEnvelope, SlackEvent},
    payload::{decode_events_api, decode_interaction, EventsApiRequest, InteractionForm},
    signature::{RequestVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER},
};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Slack caps interaction payloads well below this.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct IngressState {
    dispatcher: Arc<EventDispatcher>,
    verifier: Arc<RequestVerifier>,
}

impl IngressState {
    pub fn new(dispatcher: Arc<EventDispatcher>, verifier: RequestVerifier) -> Self {
        Self { dispatcher, verifier: Arc::new(verifier) }
    }

    /// Hands the event to the dispatcher on its own task so the HTTP ack is not held up.
    fn dispatch_in_background(&self, envelope_id: Option<String>, event: SlackEvent) {
        let correlation_id = Uuid::new_v4().to_string();
        let envelope = SlackEnvelope {
            envelope_id: envelope_id.unwrap_or_else(|| correlation_id.clone()),
            event,
        };
        let dispatcher = self.dispatcher.clone();

        info!(
            event_name = "ingress.slack.envelope_received",
            envelope_id = %envelope.envelope_id,
            event_type = envelope.event.event_type().as_str(),
            correlation_id = %correlation_id,
            "slack request acknowledged"
        );

        tokio::spawn(async move {
            let context = EventContext { correlation_id };
            match dispatcher.dispatch(&envelope, &context).await {
                Ok(result) => debug!(
                    event_name = "ingress.slack.dispatched",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %context.correlation_id,
                    result = ?result,
                    "event dispatch finished"
                ),
                Err(error) => warn!(
                    event_name = "ingress.slack.dispatch_failed",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %context.correlation_id,
                    event_type = envelope.event.event_type().as_str(),
                    error = %error,
                    "event dispatch failed"
                ),
            }
        });
    }
}

pub fn router(state: IngressState) -> Router {
    Router::new()
        .route("/slack/commands", post(slash_command))
        .route("/slack/interactions", post(interaction))
        .route("/slack/events", post(events_api))
        .layer(middleware::from_fn_with_state(state.clone(), verify_signature))
        .with_state(state)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

async fn verify_signature(
    State(state): State<IngressState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(
                event_name = "ingress.slack.body_rejected",
                path = %parts.uri.path(),
                error = %error,
                "could not buffer slack request body"
            );
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let verdict = state.verifier.verify(
        header(&parts.headers, TIMESTAMP_HEADER),
        header(&parts.headers, SIGNATURE_HEADER),
        &bytes,
        Utc::now().timestamp(),
    );
    if let Err(error) = verdict {
        warn!(
            event_name = "ingress.slack.signature_rejected",
            path = %parts.uri.path(),
            error = %error,
            "rejected request with invalid slack signature"
        );
        return StatusCode::UNAUTHORIZED.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn slash_command(
    State(state): State<IngressState>,
    Form(payload): Form<SlashCommandPayload>,
) -> StatusCode {
    state.dispatch_in_background(None, SlackEvent::SlashCommand(payload));
    StatusCode::OK
}

async fn interaction(
    State(state): State<IngressState>,
    Form(form): Form<InteractionForm>,
) -> StatusCode {
    match decode_interaction(&form.payload) {
        Ok(events) => {
            for event in events {
                state.dispatch_in_background(None, event);
            }
            StatusCode::OK
        }
        Err(error) => {
            warn!(
                event_name = "ingress.slack.decode_failed",
                error = %error,
                "bad interaction payload"
            );
            StatusCode::BAD_REQUEST
        }
    }
}

async fn events_api(State(state): State<IngressState>, body: Bytes) -> Response {
    match decode_events_api(&body) {
        Ok(EventsApiRequest::UrlVerification { challenge }) => {
            Json(json!({ "challenge": challenge })).into_response()
        }
        Ok(EventsApiRequest::Event { event_id, event }) => {
            state.dispatch_in_background(event_id, event);
            StatusCode::OK.into_response()
        }
        Err(error) => {
            warn!(
                event_name = "ingress.slack.decode_failed",
                error = %error,
                "bad events api body"
            );
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
