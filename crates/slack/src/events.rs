use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use emojibot_core::{PreferenceError, PreferenceStore, UnknownStyle};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    actions::BlockActionHandler,
    client::{SlackApiError, SlackClient},
    commands::{SlashCommandHandler, SlashCommandPayload},
    home::AppHomeOpenedHandler,
    metadata::MetadataError,
    shortcuts::ShortcutHandler,
    views::ViewSubmissionHandler,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlackEnvelope {
    pub envelope_id: String,
    pub event: SlackEvent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlackEvent {
    SlashCommand(SlashCommandPayload),
    BlockAction(BlockActionEvent),
    ViewSubmission(ViewSubmissionEvent),
    Shortcut(ShortcutEvent),
    AppHomeOpened(AppHomeOpenedEvent),
    Unsupported { event_type: String },
}

impl SlackEvent {
    pub fn event_type(&self) -> SlackEventType {
        match self {
            Self::SlashCommand(_) => SlackEventType::SlashCommand,
            Self::BlockAction(_) => SlackEventType::BlockAction,
            Self::ViewSubmission(_) => SlackEventType::ViewSubmission,
            Self::Shortcut(_) => SlackEventType::Shortcut,
            Self::AppHomeOpened(_) => SlackEventType::AppHomeOpened,
            Self::Unsupported { .. } => SlackEventType::Unsupported,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlackEventType {
    SlashCommand,
    BlockAction,
    ViewSubmission,
    Shortcut,
    AppHomeOpened,
    Unsupported,
}

impl SlackEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SlashCommand => "slash_command",
            Self::BlockAction => "block_action",
            Self::ViewSubmission => "view_submission",
            Self::Shortcut => "shortcut",
            Self::AppHomeOpened => "app_home_opened",
            Self::Unsupported => "unsupported",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockActionEvent {
    pub action_id: String,
    pub value: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub trigger_id: String,
    pub channel_id: Option<String>,
    pub response_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSubmissionEvent {
    pub callback_id: String,
    pub private_metadata: String,
    pub user_id: String,
    pub user_name: String,
    pub state: ViewState,
}

/// Submitted input values keyed by block id, then action id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, ViewStateValue>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ViewStateValue {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

impl ViewState {
    fn entry(&self, block_id: &str, action_id: &str) -> Option<&ViewStateValue> {
        self.values.get(block_id).and_then(|actions| actions.get(action_id))
    }

    /// Text typed into a plain-text input.
    pub fn text_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.entry(block_id, action_id).and_then(|entry| entry.value.as_deref())
    }

    /// Value of the option picked in a select.
    pub fn selected_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.entry(block_id, action_id)
            .and_then(|entry| entry.selected_option.as_ref())
            .map(|option| option.value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortcutEvent {
    pub callback_id: String,
    pub trigger_id: String,
    pub user_id: String,
    pub channel_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppHomeOpenedEvent {
    pub user_id: String,
    pub tab: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Processed,
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventHandlerError {
    #[error(transparent)]
    Slack(#[from] SlackApiError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Preference(#[from] PreferenceError),
    #[error("rejected style selection: {0}")]
    InvalidStyle(#[from] UnknownStyle),
    #[error("submission is missing `{block_id}.{action_id}`")]
    MissingFormValue { block_id: &'static str, action_id: &'static str },
    #[error("interaction carries no channel to reply in")]
    MissingChannel,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> SlackEventType;
    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<SlackEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&envelope.event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Dispatcher with every bot route registered against shared dependencies.
pub fn bot_dispatcher(
    client: Arc<dyn SlackClient>,
    preferences: Arc<dyn PreferenceStore>,
) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(SlashCommandHandler::new(client.clone()));
    dispatcher.register(BlockActionHandler::new(client.clone()));
    dispatcher.register(ViewSubmissionHandler::new(client.clone(), preferences.clone()));
    dispatcher.register(ShortcutHandler::new(client.clone()));
    dispatcher.register(AppHomeOpenedHandler::new(client, preferences));
    dispatcher
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use emojibot_core::{PreferenceStore, StylePreference};
    use emojibot_db::InMemoryPreferenceStore;

    use super::{
        bot_dispatcher, AppHomeOpenedEvent, EventContext, HandlerResult, SlackEnvelope,
        SlackEvent, ViewState, ViewSubmissionEvent,
    };
    use crate::{
        blocks::{home_view, View},
        testing::{RecordingSlackClient, SlackCall},
    };

    fn envelope(event: SlackEvent) -> SlackEnvelope {
        SlackEnvelope { envelope_id: "env-1".to_owned(), event }
    }

    #[tokio::test]
    async fn registers_one_handler_per_routed_event() {
        let dispatcher = bot_dispatcher(
            Arc::new(RecordingSlackClient::default()),
            Arc::new(InMemoryPreferenceStore::new()),
        );
        assert_eq!(dispatcher.handler_count(), 5);
    }

    #[tokio::test]
    async fn unsupported_events_are_ignored() {
        let dispatcher = bot_dispatcher(
            Arc::new(RecordingSlackClient::default()),
            Arc::new(InMemoryPreferenceStore::new()),
        );
        let result = dispatcher
            .dispatch(
                &envelope(SlackEvent::Unsupported { event_type: "reaction_added".to_owned() }),
                &EventContext::default(),
            )
            .await
            .expect("dispatch");
        assert_eq!(result, HandlerResult::Ignored);
    }

    #[tokio::test]
    async fn style_choice_reaches_the_next_home_tab_open() {
        let client = Arc::new(RecordingSlackClient::default());
        let preferences = Arc::new(InMemoryPreferenceStore::new());
        let dispatcher = bot_dispatcher(client.clone(), preferences.clone());
        let ctx = EventContext::default();

        let state: ViewState = serde_json::from_value(serde_json::json!({
            "values": { "style_select": { "style_choice": {
                "type": "static_select",
                "selected_option": { "value": "formal" }
            } } }
        }))
        .expect("view state");
        dispatcher
            .dispatch(
                &envelope(SlackEvent::ViewSubmission(ViewSubmissionEvent {
                    callback_id: "default_style_modal".to_owned(),
                    private_metadata: String::new(),
                    user_id: "U1".to_owned(),
                    user_name: "ada".to_owned(),
                    state,
                })),
                &ctx,
            )
            .await
            .expect("submission handled");

        dispatcher
            .dispatch(
                &envelope(SlackEvent::AppHomeOpened(AppHomeOpenedEvent {
                    user_id: "U1".to_owned(),
                    tab: Some("home".to_owned()),
                })),
                &ctx,
            )
            .await
            .expect("home handled");

        assert_eq!(
            preferences.find_style("U1").await.expect("lookup"),
            Some(StylePreference::Formal)
        );
        let published: Vec<View> = client
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                SlackCall::PublishView { view, .. } => Some(view),
                _ => None,
            })
            .collect();
        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|view| *view == home_view(StylePreference::Formal)));
    }
}
