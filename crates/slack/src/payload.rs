//! Decoding of Slack's inbound wire formats into [`SlackEvent`]s.
//!
//! Interactions arrive as a form field named `payload` holding JSON; Events API
//! callbacks arrive as a JSON body. Slash commands are plain form fields and
//! decode straight into [`SlashCommandPayload`].

use serde::Deserialize;
use thiserror::Error;

use crate::{
    commands::SlashCommandPayload,
    events::{
        AppHomeOpenedEvent, BlockActionEvent, ShortcutEvent, SlackEvent, ViewState,
        ViewSubmissionEvent,
    },
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("interaction payload is not valid json: {0}")]
    Interaction(String),
    #[error("events api body is not valid json: {0}")]
    EventsApi(String),
}

/// Form body of an interaction request.
#[derive(Clone, Debug, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

/// What the events endpoint must do with a decoded body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventsApiRequest {
    UrlVerification { challenge: String },
    Event { event_id: Option<String>, event: SlackEvent },
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl RawUser {
    fn display_name(&self) -> String {
        self.username.clone().or_else(|| self.name.clone()).unwrap_or_else(|| self.id.clone())
    }
}

#[derive(Debug, Deserialize)]
struct RawChannel {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    action_id: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawView {
    callback_id: String,
    #[serde(default)]
    private_metadata: String,
    #[serde(default)]
    state: ViewState,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawInteraction {
    BlockActions {
        user: RawUser,
        #[serde(default)]
        trigger_id: String,
        #[serde(default)]
        channel: Option<RawChannel>,
        #[serde(default)]
        response_url: Option<String>,
        #[serde(default)]
        actions: Vec<RawAction>,
    },
    ViewSubmission {
        user: RawUser,
        view: RawView,
    },
    Shortcut {
        callback_id: String,
        trigger_id: String,
        user: RawUser,
    },
    MessageAction {
        callback_id: String,
        trigger_id: String,
        user: RawUser,
        #[serde(default)]
        channel: Option<RawChannel>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawEventsApi {
    UrlVerification {
        challenge: String,
    },
    EventCallback {
        #[serde(default)]
        event_id: Option<String>,
        event: RawInnerEvent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawInnerEvent {
    AppHomeOpened {
        user: String,
        #[serde(default)]
        tab: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// Decodes the JSON carried in an interaction's `payload` field.
///
/// `block_actions` yields one event per action in the payload.
pub fn decode_interaction(raw: &str) -> Result<Vec<SlackEvent>, PayloadError> {
    let interaction: RawInteraction =
        serde_json::from_str(raw).map_err(|error| PayloadError::Interaction(error.to_string()))?;

    Ok(match interaction {
        RawInteraction::BlockActions { user, trigger_id, channel, response_url, actions } => {
            let channel_id = channel.map(|channel| channel.id);
            actions
                .into_iter()
                .map(|action| {
                    SlackEvent::BlockAction(BlockActionEvent {
                        action_id: action.action_id,
                        value: action.value,
                        user_id: user.id.clone(),
                        user_name: user.display_name(),
                        trigger_id: trigger_id.clone(),
                        channel_id: channel_id.clone(),
                        response_url: response_url.clone(),
                    })
                })
                .collect()
        }
        RawInteraction::ViewSubmission { user, view } => {
            vec![SlackEvent::ViewSubmission(ViewSubmissionEvent {
                callback_id: view.callback_id,
                private_metadata: view.private_metadata,
                user_name: user.display_name(),
                user_id: user.id,
                state: view.state,
            })]
        }
        RawInteraction::Shortcut { callback_id, trigger_id, user } => {
            vec![SlackEvent::Shortcut(ShortcutEvent {
                callback_id,
                trigger_id,
                user_id: user.id,
                channel_id: None,
            })]
        }
        RawInteraction::MessageAction { callback_id, trigger_id, user, channel } => {
            vec![SlackEvent::Shortcut(ShortcutEvent {
                callback_id,
                trigger_id,
                user_id: user.id,
                channel_id: channel.map(|channel| channel.id),
            })]
        }
        RawInteraction::Other => {
            vec![SlackEvent::Unsupported { event_type: "interaction".to_owned() }]
        }
    })
}

pub fn decode_events_api(body: &[u8]) -> Result<EventsApiRequest, PayloadError> {
    let request: RawEventsApi =
        serde_json::from_slice(body).map_err(|error| PayloadError::EventsApi(error.to_string()))?;

    Ok(match request {
        RawEventsApi::UrlVerification { challenge } => {
            EventsApiRequest::UrlVerification { challenge }
        }
        RawEventsApi::EventCallback { event_id, event } => {
            let event = match event {
                RawInnerEvent::AppHomeOpened { user, tab } => {
                    SlackEvent::AppHomeOpened(AppHomeOpenedEvent { user_id: user, tab })
                }
                RawInnerEvent::Other => {
                    SlackEvent::Unsupported { event_type: "event_callback".to_owned() }
                }
            };
            EventsApiRequest::Event { event_id, event }
        }
        RawEventsApi::Other => EventsApiRequest::Event {
            event_id: None,
            event: SlackEvent::Unsupported { event_type: "events_api".to_owned() },
        },
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{decode_events_api, decode_interaction, EventsApiRequest, PayloadError};
    use crate::events::{AppHomeOpenedEvent, SlackEvent};

    #[test]
    fn block_actions_decode_per_action() {
        let raw = json!({
            "type": "block_actions",
            "user": { "id": "U1", "username": "ada", "name": "ada", "team_id": "T1" },
            "trigger_id": "123.456",
            "channel": { "id": "C1", "name": "general" },
            "response_url": "https://hooks.slack.com/actions/T1/1/x",
            "actions": [
                { "type": "button", "action_id": "feedback_yes", "block_id": "feedback.actions", "value": "hello" }
            ]
        })
        .to_string();

        let events = decode_interaction(&raw).expect("decodes");
        let [SlackEvent::BlockAction(action)] = events.as_slice() else {
            panic!("expected one block action, got {events:?}");
        };
        assert_eq!(action.action_id, "feedback_yes");
        assert_eq!(action.value.as_deref(), Some("hello"));
        assert_eq!(action.user_name, "ada");
        assert_eq!(action.channel_id.as_deref(), Some("C1"));
        assert_eq!(action.response_url.as_deref(), Some("https://hooks.slack.com/actions/T1/1/x"));
    }

    #[test]
    fn home_tab_actions_have_no_channel_or_response_url() {
        let raw = json!({
            "type": "block_actions",
            "user": { "id": "U1" },
            "trigger_id": "t",
            "view": { "type": "home" },
            "actions": [{ "action_id": "open_default_setting" }]
        })
        .to_string();

        let events = decode_interaction(&raw).expect("decodes");
        let [SlackEvent::BlockAction(action)] = events.as_slice() else {
            panic!("expected one block action");
        };
        assert_eq!(action.channel_id, None);
        assert_eq!(action.response_url, None);
        assert_eq!(action.user_name, "U1");
    }

    #[test]
    fn view_submission_decodes_state_and_metadata() {
        let raw = json!({
            "type": "view_submission",
            "user": { "id": "U2", "username": "grace" },
            "view": {
                "id": "V1",
                "callback_id": "default_style_modal",
                "private_metadata": "",
                "state": { "values": { "style_select": { "style_choice": {
                    "type": "static_select",
                    "selected_option": { "text": { "type": "plain_text", "text": "🐰 Cute" }, "value": "cute" }
                } } } }
            }
        })
        .to_string();

        let events = decode_interaction(&raw).expect("decodes");
        let [SlackEvent::ViewSubmission(submission)] = events.as_slice() else {
            panic!("expected view submission");
        };
        assert_eq!(submission.callback_id, "default_style_modal");
        assert_eq!(submission.user_name, "grace");
        assert_eq!(submission.state.selected_value("style_select", "style_choice"), Some("cute"));
    }

    #[test]
    fn message_shortcuts_keep_their_channel() {
        let message_action = json!({
            "type": "message_action",
            "callback_id": "translate",
            "trigger_id": "t1",
            "user": { "id": "U3" },
            "channel": { "id": "C3" },
            "message": { "text": "hello" }
        })
        .to_string();
        let global = json!({
            "type": "shortcut",
            "callback_id": "translate",
            "trigger_id": "t2",
            "user": { "id": "U3" }
        })
        .to_string();

        let events = decode_interaction(&message_action).expect("decodes");
        assert!(matches!(
            events.as_slice(),
            [SlackEvent::Shortcut(shortcut)] if shortcut.channel_id.as_deref() == Some("C3")
        ));
        let events = decode_interaction(&global).expect("decodes");
        assert!(matches!(
            events.as_slice(),
            [SlackEvent::Shortcut(shortcut)] if shortcut.channel_id.is_none() && shortcut.trigger_id == "t2"
        ));
    }

    #[test]
    fn unknown_interactions_are_unsupported_and_garbage_fails() {
        let events =
            decode_interaction(&json!({ "type": "view_closed" }).to_string()).expect("decodes");
        assert!(matches!(events.as_slice(), [SlackEvent::Unsupported { .. }]));
        assert!(matches!(decode_interaction("payload="), Err(PayloadError::Interaction(_))));
    }

    #[test]
    fn events_api_answers_challenge_and_decodes_home_opened() {
        let challenge = json!({ "type": "url_verification", "token": "x", "challenge": "abc123" });
        assert_eq!(
            decode_events_api(challenge.to_string().as_bytes()).expect("decodes"),
            EventsApiRequest::UrlVerification { challenge: "abc123".to_owned() }
        );

        let callback = json!({
            "type": "event_callback",
            "event_id": "Ev1",
            "event": { "type": "app_home_opened", "user": "U4", "channel": "D4", "tab": "home" }
        });
        assert_eq!(
            decode_events_api(callback.to_string().as_bytes()).expect("decodes"),
            EventsApiRequest::Event {
                event_id: Some("Ev1".to_owned()),
                event: SlackEvent::AppHomeOpened(AppHomeOpenedEvent {
                    user_id: "U4".to_owned(),
                    tab: Some("home".to_owned()),
                }),
            }
        );

        let other = json!({ "type": "event_callback", "event": { "type": "reaction_added" } });
        assert!(matches!(
            decode_events_api(other.to_string().as_bytes()),
            Ok(EventsApiRequest::Event { event: SlackEvent::Unsupported { .. }, .. })
        ));
    }
}
