use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    blocks::shortcut_modal,
    client::SlackClient,
    events::{
        EventContext, EventHandler, EventHandlerError, HandlerResult, SlackEnvelope, SlackEvent,
        SlackEventType,
    },
    metadata::ModalMetadata,
};

/// Callback id configured for the shortcut in the Slack app manifest.
pub const TRANSLATE_SHORTCUT: &str = "translate";
pub const SHORTCUT_ORIGIN_MESSAGE: &str = "Shortcut triggered";

pub struct ShortcutHandler {
    client: Arc<dyn SlackClient>,
}

impl ShortcutHandler {
    pub fn new(client: Arc<dyn SlackClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventHandler for ShortcutHandler {
    fn event_type(&self) -> SlackEventType {
        SlackEventType::Shortcut
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::Shortcut(shortcut) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };
        if shortcut.callback_id != TRANSLATE_SHORTCUT {
            debug!(
                event_name = "shortcut.ignored",
                correlation_id = %ctx.correlation_id,
                callback_id = %shortcut.callback_id,
                "no route for shortcut"
            );
            return Ok(HandlerResult::Ignored);
        }

        info!(
            event_name = "shortcut.received",
            correlation_id = %ctx.correlation_id,
            user_id = %shortcut.user_id,
            channel_id = shortcut.channel_id.as_deref().unwrap_or_default(),
            "translate shortcut invoked"
        );

        // Global shortcuts arrive without a channel, so there is nowhere to post the result.
        let channel_id = shortcut.channel_id.as_deref().ok_or(EventHandlerError::MissingChannel)?;
        let metadata =
            ModalMetadata::for_channel(channel_id).with_message(SHORTCUT_ORIGIN_MESSAGE).encode()?;
        self.client.open_view(&shortcut.trigger_id, &shortcut_modal(metadata)).await?;
        Ok(HandlerResult::Processed)
    }
}
