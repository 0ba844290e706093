use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::{
    blocks::View,
    client::{ChatMessage, ResponseMessage, SlackApiError, SlackClient},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlackCall {
    PostMessage(ChatMessage),
    OpenView { trigger_id: String, view: View },
    PublishView { user_id: String, view: View },
    Respond { response_url: String, message: ResponseMessage },
}

/// Records every outbound call; `post_message` replays scripted failures first.
#[derive(Default)]
pub struct RecordingSlackClient {
    calls: Mutex<Vec<SlackCall>>,
    post_failures: Mutex<VecDeque<SlackApiError>>,
}

impl RecordingSlackClient {
    pub fn failing_posts(errors: impl IntoIterator<Item = SlackApiError>) -> Self {
        Self { calls: Mutex::default(), post_failures: Mutex::new(errors.into_iter().collect()) }
    }

    pub fn calls(&self) -> Vec<SlackCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn posted(&self) -> Vec<ChatMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SlackCall::PostMessage(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SlackCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

pub fn api_error(code: &str) -> SlackApiError {
    SlackApiError::Api { method: "chat.postMessage".to_owned(), code: code.to_owned() }
}

#[async_trait]
impl SlackClient for RecordingSlackClient {
    async fn post_message(&self, message: &ChatMessage) -> Result<(), SlackApiError> {
        self.record(SlackCall::PostMessage(message.clone()));
        match self.post_failures.lock().expect("failures lock").pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn open_view(&self, trigger_id: &str, view: &View) -> Result<(), SlackApiError> {
        self.record(SlackCall::OpenView { trigger_id: trigger_id.to_owned(), view: view.clone() });
        Ok(())
    }

    async fn publish_view(&self, user_id: &str, view: &View) -> Result<(), SlackApiError> {
        self.record(SlackCall::PublishView { user_id: user_id.to_owned(), view: view.clone() });
        Ok(())
    }

    async fn respond(
        &self,
        response_url: &str,
        message: &ResponseMessage,
    ) -> Result<(), SlackApiError> {
        self.record(SlackCall::Respond {
            response_url: response_url.to_owned(),
            message: message.clone(),
        });
        Ok(())
    }
}
