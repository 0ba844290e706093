use std::sync::Arc;

use async_trait::async_trait;
use emojibot_core::{PreferenceStore, StylePreference};
use tracing::{info, warn};

use crate::{
    blocks::home_view,
    client::SlackClient,
    events::{
        EventContext, EventHandler, EventHandlerError, HandlerResult, SlackEnvelope, SlackEvent,
        SlackEventType,
    },
};

/// Publishes the home tab whenever a user opens it.
pub struct AppHomeOpenedHandler {
    client: Arc<dyn SlackClient>,
    preferences: Arc<dyn PreferenceStore>,
}

impl AppHomeOpenedHandler {
    pub fn new(client: Arc<dyn SlackClient>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self { client, preferences }
    }

    /// Stored style, degrading to the default when the backend is unavailable.
    async fn current_style(&self, user_id: &str, ctx: &EventContext) -> StylePreference {
        match self.preferences.style_or_default(user_id).await {
            Ok(style) => style,
            Err(error) => {
                warn!(
                    event_name = "preference.read_failed",
                    correlation_id = %ctx.correlation_id,
                    user_id,
                    error = %error,
                    "rendering home tab with default style"
                );
                StylePreference::default()
            }
        }
    }
}

#[async_trait]
impl EventHandler for AppHomeOpenedHandler {
    fn event_type(&self) -> SlackEventType {
        SlackEventType::AppHomeOpened
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::AppHomeOpened(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let style = self.current_style(&event.user_id, ctx).await;
        self.client.publish_view(&event.user_id, &home_view(style)).await?;
        info!(
            event_name = "home.published",
            correlation_id = %ctx.correlation_id,
            user_id = %event.user_id,
            style = style.as_tag(),
            "published home tab"
        );
        Ok(HandlerResult::Processed)
    }
}
