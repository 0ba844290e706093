use std::sync::Arc;

use async_trait::async_trait;
use emojibot_core::placeholder_translation;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    blocks::{command_modal, feedback_blocks, feedback_message, MessageBuilder, MessageTemplate},
    client::{ChatMessage, ResponseMessage, SlackApiError, SlackClient},
    events::{
        EventContext, EventHandler, EventHandlerError, HandlerResult, SlackEnvelope, SlackEvent,
        SlackEventType,
    },
    metadata::ModalMetadata,
};

/// Slash command form fields Slack posts to the command request URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SlashCommandPayload {
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub trigger_id: String,
    #[serde(default)]
    pub response_url: String,
}

/// One translation direction exposed as a slash command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranslationCommand {
    pub name: &'static str,
    pub label: &'static str,
}

impl TranslationCommand {
    pub fn modal_callback_id(&self) -> String {
        format!("{}_modal", self.name)
    }
}

pub const TEXT_TO_EMOJI: TranslationCommand =
    TranslationCommand { name: "/text-to-emoji", label: "Text → Emoji" };
pub const EMOJI_TO_TEXT: TranslationCommand =
    TranslationCommand { name: "/emoji-to-text", label: "Emoji → text" };

pub const TRANSLATION_COMMANDS: [TranslationCommand; 2] = [TEXT_TO_EMOJI, EMOJI_TO_TEXT];

pub fn find_command(name: &str) -> Option<TranslationCommand> {
    TRANSLATION_COMMANDS.into_iter().find(|command| command.name == name)
}

pub fn find_command_by_modal(callback_id: &str) -> Option<TranslationCommand> {
    TRANSLATION_COMMANDS.into_iter().find(|command| command.modal_callback_id() == callback_id)
}

pub struct SlashCommandHandler {
    client: Arc<dyn SlackClient>,
}

impl SlashCommandHandler {
    pub fn new(client: Arc<dyn SlackClient>) -> Self {
        Self { client }
    }

    async fn quick_translate(
        &self,
        command: TranslationCommand,
        payload: &SlashCommandPayload,
        text: &str,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let translation = placeholder_translation(text);

        match self.post_in_channel(command, payload, text, &translation).await {
            Ok(()) => {
                info!(
                    event_name = "command.translated",
                    correlation_id = %ctx.correlation_id,
                    command = command.name,
                    channel_id = %payload.channel_id,
                    "posted quick translation"
                );
            }
            Err(error) if error.is_channel_not_found() => {
                info!(
                    event_name = "command.fallback_ephemeral",
                    correlation_id = %ctx.correlation_id,
                    command = command.name,
                    channel_id = %payload.channel_id,
                    "bot cannot post in channel, replying ephemerally"
                );
                self.reply_ephemeral(command, payload, text, &translation).await?;
            }
            Err(error) => {
                warn!(
                    event_name = "command.post_failed",
                    correlation_id = %ctx.correlation_id,
                    command = command.name,
                    channel_id = %payload.channel_id,
                    error = %error,
                    "failed to post quick translation"
                );
            }
        }

        Ok(HandlerResult::Processed)
    }

    async fn post_in_channel(
        &self,
        command: TranslationCommand,
        payload: &SlashCommandPayload,
        text: &str,
        translation: &str,
    ) -> Result<(), SlackApiError> {
        let headline = format!(
            ":sparkles: *{} by {}:*\n{translation}",
            command.label, payload.user_name
        );
        self.client.post_message(&ChatMessage::text(&payload.channel_id, headline)).await?;
        self.client
            .post_message(&ChatMessage::new(&payload.channel_id, feedback_message(text)))
            .await
    }

    async fn reply_ephemeral(
        &self,
        command: TranslationCommand,
        payload: &SlashCommandPayload,
        text: &str,
        translation: &str,
    ) -> Result<(), EventHandlerError> {
        if payload.response_url.is_empty() {
            return Err(EventHandlerError::MissingChannel);
        }

        let message = ephemeral_translation(command, text, translation);
        self.client.respond(&payload.response_url, &ResponseMessage::ephemeral(message)).await?;
        Ok(())
    }
}

fn ephemeral_translation(
    command: TranslationCommand,
    text: &str,
    translation: &str,
) -> MessageTemplate {
    let headline = format!(":sparkles: *{}:*\n{translation}", command.label);
    MessageBuilder::new(headline.clone())
        .section("translation.result", |section| {
            section.mrkdwn(headline);
        })
        .extend(feedback_blocks(text))
        .build()
}

#[async_trait]
impl EventHandler for SlashCommandHandler {
    fn event_type(&self) -> SlackEventType {
        SlackEventType::SlashCommand
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::SlashCommand(payload) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };
        let Some(command) = find_command(&payload.command) else {
            warn!(
                event_name = "command.unknown",
                correlation_id = %ctx.correlation_id,
                command = %payload.command,
                "ignoring unregistered slash command"
            );
            return Ok(HandlerResult::Ignored);
        };

        let text = payload.text.trim();
        if !text.is_empty() {
            return self.quick_translate(command, payload, text, ctx).await;
        }

        let metadata = ModalMetadata::for_channel(&payload.channel_id).encode()?;
        self.client
            .open_view(&payload.trigger_id, &command_modal(command.modal_callback_id(), metadata))
            .await?;
        info!(
            event_name = "command.modal_opened",
            correlation_id = %ctx.correlation_id,
            command = command.name,
            user_id = %payload.user_id,
            "opened interactive translation modal"
        );
        Ok(HandlerResult::Processed)
    }
}
