use std::sync::Arc;

use async_trait::async_trait;
use emojibot_core::{placeholder_translation, PreferenceStore, StylePreference};
use tracing::{debug, info, warn};

use crate::{
    blocks::{
        feedback_message, home_view, BLOCK_FEEDBACK, BLOCK_INPUT_TEXT, BLOCK_STYLE_SELECT,
        CALLBACK_DEFAULT_STYLE, CALLBACK_FEEDBACK, CALLBACK_TRANSLATE, ELEMENT_FEEDBACK_INPUT,
        ELEMENT_STYLE_CHOICE, ELEMENT_VALUE_INPUT,
    },
    client::{ChatMessage, SlackClient},
    commands::find_command_by_modal,
    events::{
        EventContext, EventHandler, EventHandlerError, HandlerResult, SlackEnvelope, SlackEvent,
        SlackEventType, ViewSubmissionEvent,
    },
    metadata::ModalMetadata,
};

pub const INTERACTIVE_MODE_ACK: &str = "testing for Slash Command Interactive Mode";

pub struct ViewSubmissionHandler {
    client: Arc<dyn SlackClient>,
    preferences: Arc<dyn PreferenceStore>,
}

impl ViewSubmissionHandler {
    pub fn new(client: Arc<dyn SlackClient>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self { client, preferences }
    }

    async fn translate(&self, submission: &ViewSubmissionEvent) -> Result<(), EventHandlerError> {
        let metadata = ModalMetadata::decode(&submission.private_metadata)?;
        let text =
            submission.state.text_value(BLOCK_INPUT_TEXT, ELEMENT_VALUE_INPUT).unwrap_or_default();
        let original = metadata.message.as_deref().unwrap_or(text);

        let headline = format!(
            ":sparkles: *Emoji Translation by {}:*\n> *Original:* {original}\n{}",
            submission.user_name,
            placeholder_translation(text)
        );
        self.client.post_message(&ChatMessage::text(&metadata.channel_id, headline)).await?;
        self.client
            .post_message(&ChatMessage::new(&metadata.channel_id, feedback_message(text)))
            .await?;
        Ok(())
    }

    async fn save_default_style(
        &self,
        submission: &ViewSubmissionEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        let choice = submission
            .state
            .selected_value(BLOCK_STYLE_SELECT, ELEMENT_STYLE_CHOICE)
            .ok_or(EventHandlerError::MissingFormValue {
                block_id: BLOCK_STYLE_SELECT,
                action_id: ELEMENT_STYLE_CHOICE,
            })?;

        let style: StylePreference = choice.parse().map_err(|error| {
            warn!(
                event_name = "preference.rejected",
                correlation_id = %ctx.correlation_id,
                user_id = %submission.user_id,
                choice,
                "rejected style outside the catalogue"
            );
            EventHandlerError::InvalidStyle(error)
        })?;

        self.preferences.save_style(&submission.user_id, style).await?;
        info!(
            event_name = "preference.saved",
            correlation_id = %ctx.correlation_id,
            user_id = %submission.user_id,
            style = style.as_tag(),
            "default style updated"
        );

        self.client.publish_view(&submission.user_id, &home_view(style)).await?;
        Ok(())
    }

    async fn acknowledge_interactive_mode(
        &self,
        submission: &ViewSubmissionEvent,
    ) -> Result<(), EventHandlerError> {
        let metadata = ModalMetadata::decode(&submission.private_metadata)?;
        let message = ChatMessage::text(&metadata.channel_id, INTERACTIVE_MODE_ACK);
        self.client.post_message(&message).await?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for ViewSubmissionHandler {
    fn event_type(&self) -> SlackEventType {
        SlackEventType::ViewSubmission
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::ViewSubmission(submission) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        match submission.callback_id.as_str() {
            CALLBACK_TRANSLATE => self.translate(submission).await?,
            CALLBACK_DEFAULT_STYLE => self.save_default_style(submission, ctx).await?,
            CALLBACK_FEEDBACK => {
                let feedback = submission
                    .state
                    .text_value(BLOCK_FEEDBACK, ELEMENT_FEEDBACK_INPUT)
                    .unwrap_or_default();
                info!(
                    event_name = "feedback.submitted",
                    correlation_id = %ctx.correlation_id,
                    user_id = %submission.user_id,
                    user_name = %submission.user_name,
                    feedback,
                    "feedback modal submitted"
                );
            }
            callback_id if find_command_by_modal(callback_id).is_some() => {
                self.acknowledge_interactive_mode(submission).await?;
            }
            callback_id => {
                debug!(
                    event_name = "view.ignored",
                    correlation_id = %ctx.correlation_id,
                    callback_id,
                    "no route for view submission"
                );
                return Ok(HandlerResult::Ignored);
            }
        }

        Ok(HandlerResult::Processed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use emojibot_core::{PreferenceStore, StylePreference};
    use emojibot_db::InMemoryPreferenceStore;
    use serde_json::json;

    use super::ViewSubmissionHandler;
    use crate::{
        blocks::{home_view, Block, TextObject, FEEDBACK_PROMPT},
        events::{
            EventContext, EventHandler, EventHandlerError, HandlerResult, SlackEnvelope,
            SlackEvent, ViewState, ViewSubmissionEvent,
        },
        metadata::{MetadataError, ModalMetadata},
        testing::{RecordingSlackClient, SlackCall},
    };

    fn submission(callback_id: &str, metadata: &str, state: serde_json::Value) -> SlackEnvelope {
        SlackEnvelope {
            envelope_id: "view-1".to_owned(),
            event: SlackEvent::ViewSubmission(ViewSubmissionEvent {
                callback_id: callback_id.to_owned(),
                private_metadata: metadata.to_owned(),
                user_id: "U3".to_owned(),
                user_name: "linus".to_owned(),
                state: serde_json::from_value::<ViewState>(state).expect("view state"),
            }),
        }
    }

    fn style_state(value: &str) -> serde_json::Value {
        json!({ "values": { "style_select": { "style_choice": {
            "type": "static_select",
            "selected_option": { "text": { "type": "plain_text", "text": value }, "value": value }
        } } } })
    }

    fn handler() -> (Arc<RecordingSlackClient>, Arc<InMemoryPreferenceStore>, ViewSubmissionHandler)
    {
        let client = Arc::new(RecordingSlackClient::default());
        let preferences = Arc::new(InMemoryPreferenceStore::new());
        let handler = ViewSubmissionHandler::new(client.clone(), preferences.clone());
        (client, preferences, handler)
    }

    #[tokio::test]
    async fn style_submission_persists_and_republishes_home() {
        let (client, preferences, handler) = handler();

        handler
            .handle(
                &submission("default_style_modal", "", style_state("cute")),
                &EventContext::default(),
            )
            .await
            .expect("saved");

        assert_eq!(
            preferences.find_style("U3").await.expect("lookup"),
            Some(StylePreference::Cute)
        );
        assert_eq!(
            client.calls(),
            [SlackCall::PublishView {
                user_id: "U3".to_owned(),
                view: home_view(StylePreference::Cute)
            }]
        );
    }

    #[tokio::test]
    async fn unknown_style_is_rejected_without_writing() {
        let (client, preferences, handler) = handler();

        let error = handler
            .handle(
                &submission("default_style_modal", "", style_state("sarcastic")),
                &EventContext::default(),
            )
            .await
            .expect_err("rejected");

        assert!(matches!(error, EventHandlerError::InvalidStyle(_)));
        assert!(preferences.is_empty().await);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn style_submission_without_selection_fails() {
        let (_client, preferences, handler) = handler();

        let error = handler
            .handle(
                &submission("default_style_modal", "", json!({ "values": {} })),
                &EventContext::default(),
            )
            .await
            .expect_err("missing selection");

        assert_eq!(
            error,
            EventHandlerError::MissingFormValue {
                block_id: "style_select",
                action_id: "style_choice"
            }
        );
        assert!(preferences.is_empty().await);
    }

    #[tokio::test]
    async fn translate_modal_posts_to_metadata_channel() {
        let (client, _preferences, handler) = handler();
        let metadata = ModalMetadata::for_channel("C5")
            .with_message("Shortcut triggered")
            .encode()
            .expect("metadata");
        let state = json!({ "values": { "input_text": { "value_input": {
            "type": "plain_text_input", "value": "good morning"
        } } } });

        handler
            .handle(&submission("translate_modal", &metadata, state), &EventContext::default())
            .await
            .expect("translated");

        let posted = client.posted();
        assert_eq!(posted.len(), 2);
        assert!(posted.iter().all(|message| message.channel == "C5"));
        assert_eq!(
            posted[0].text,
            ":sparkles: *Emoji Translation by linus:*\n> *Original:* Shortcut triggered\n\
             test data : good morning"
        );
        assert!(matches!(
            &posted[1].blocks[0],
            Block::Section { text: TextObject::Mrkdwn { text }, .. } if text == FEEDBACK_PROMPT
        ));
    }

    #[tokio::test]
    async fn malformed_metadata_fails_explicitly() {
        let (client, _preferences, handler) = handler();

        let error = handler
            .handle(
                &submission("translate_modal", "{\"channel\":\"C1\"}", json!({})),
                &EventContext::default(),
            )
            .await
            .expect_err("malformed metadata");

        assert!(matches!(error, EventHandlerError::Metadata(MetadataError::Malformed(_))));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn command_modals_post_interactive_mode_placeholder() {
        let (client, _preferences, handler) = handler();
        let metadata = ModalMetadata::for_channel("C8").encode().expect("metadata");

        for callback_id in ["/text-to-emoji_modal", "/emoji-to-text_modal"] {
            handler
                .handle(
                    &submission(callback_id, &metadata, style_state("funny")),
                    &EventContext::default(),
                )
                .await
                .expect("acknowledged");
        }

        let posted = client.posted();
        assert_eq!(posted.len(), 2);
        assert!(posted.iter().all(|message| {
            message.channel == "C8" && message.text == "testing for Slash Command Interactive Mode"
        }));
    }

    #[tokio::test]
    async fn feedback_modal_only_logs() {
        let (client, preferences, handler) = handler();
        let state = json!({ "values": { "feedback_block": { "feedback_input": {
            "type": "plain_text_input", "value": "love it"
        } } } });

        let result = handler
            .handle(&submission("feedback_modal", "", state), &EventContext::default())
            .await
            .expect("logged");

        assert_eq!(result, HandlerResult::Processed);
        assert!(client.calls().is_empty());
        assert!(preferences.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_callbacks_are_ignored() {
        let (client, _preferences, handler) = handler();

        let result = handler
            .handle(&submission("survey_modal", "", json!({})), &EventContext::default())
            .await
            .expect("handled");

        assert_eq!(result, HandlerResult::Ignored);
        assert!(client.calls().is_empty());
    }
}
