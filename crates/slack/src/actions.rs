use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    blocks::{
        feedback_modal, style_setting_modal, ACTION_FEEDBACK_NO, ACTION_FEEDBACK_YES,
        ACTION_OPEN_DEFAULT_SETTING, ACTION_OPEN_FEEDBACK,
    },
    client::{ChatMessage, ResponseMessage, SlackClient},
    events::{
        BlockActionEvent, EventContext, EventHandler, EventHandlerError, HandlerResult,
        SlackEnvelope, SlackEvent, SlackEventType,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackVote {
    Yes,
    No,
}

impl FeedbackVote {
    pub fn from_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            ACTION_FEEDBACK_YES => Some(Self::Yes),
            ACTION_FEEDBACK_NO => Some(Self::No),
            _ => None,
        }
    }

    /// Reply sent through the interaction's `response_url`.
    pub fn thanks_text(self, user_id: &str) -> String {
        match self {
            Self::Yes => format!("✅ <@{user_id}> clicked *Yes*! Thanks for the feedback."),
            Self::No => format!("🫤 <@{user_id}> clicked *No*. We'll keep improving!"),
        }
    }

    /// Shorter notice used when the interaction has no `response_url`.
    pub fn notice_text(self, user_id: &str) -> String {
        match self {
            Self::Yes => format!("✅ <@{user_id}> clicked *Yes*!"),
            Self::No => format!("🫤 <@{user_id}> clicked *No*."),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

pub struct BlockActionHandler {
    client: Arc<dyn SlackClient>,
}

impl BlockActionHandler {
    pub fn new(client: Arc<dyn SlackClient>) -> Self {
        Self { client }
    }

    async fn record_vote(
        &self,
        vote: FeedbackVote,
        event: &BlockActionEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        info!(
            event_name = "feedback.vote",
            correlation_id = %ctx.correlation_id,
            user_id = %event.user_id,
            vote = vote.as_str(),
            translated_text = event.value.as_deref().unwrap_or_default(),
            "translation feedback received"
        );

        if let Some(response_url) = event.response_url.as_deref().filter(|url| !url.is_empty()) {
            let reply = ResponseMessage::in_channel(vote.thanks_text(&event.user_id));
            self.client.respond(response_url, &reply).await?;
            return Ok(());
        }

        let channel_id = event.channel_id.as_deref().ok_or(EventHandlerError::MissingChannel)?;
        self.client
            .post_message(&ChatMessage::text(channel_id, vote.notice_text(&event.user_id)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for BlockActionHandler {
    fn event_type(&self) -> SlackEventType {
        SlackEventType::BlockAction
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::BlockAction(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        match event.action_id.as_str() {
            ACTION_OPEN_DEFAULT_SETTING => {
                self.client.open_view(&event.trigger_id, &style_setting_modal()).await?;
            }
            ACTION_OPEN_FEEDBACK => {
                self.client.open_view(&event.trigger_id, &feedback_modal()).await?;
            }
            action_id => match FeedbackVote::from_action_id(action_id) {
                Some(vote) => self.record_vote(vote, event, ctx).await?,
                None => {
                    debug!(
                        event_name = "action.ignored",
                        correlation_id = %ctx.correlation_id,
                        action_id,
                        "no route for block action"
                    );
                    return Ok(HandlerResult::Ignored);
                }
            },
        }

        Ok(HandlerResult::Processed)
    }
}
