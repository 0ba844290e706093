//! Slack Integration - Emoji Translator bot interface
//!
//! This crate provides everything between Slack's HTTP callbacks and the bot's behaviour:
//! - **Payloads** (`payload`) - Decoding of slash command, interaction and Events API bodies
//! - **Signatures** (`signature`) - `v0` request signing checks
//! - **Events** (`events`) - Event types and the dispatcher routing them to handlers
//! - **Handlers** (`commands`, `actions`, `views`, `shortcuts`, `home`) - One per inbound kind
//! - **Block Kit** (`blocks`) - Home tab, feedback prompt and modal builders
//! - **Web API** (`client`) - `chat.postMessage`, `views.open`, `views.publish`, response URLs
//!
//! # Getting Started
//!
//! 1. Create a Slack app at https://api.slack.com/apps
//! 2. Point slash commands, interactivity and event subscriptions at the server
//! 3. Add slash commands: `/text-to-emoji`, `/emoji-to-text`; a `translate` shortcut
//! 4. Set env vars: `EMOJIBOT_SLACK_BOT_TOKEN`, `EMOJIBOT_SLACK_SIGNING_SECRET`
//!
//! # Architecture
//!
//! ```text
//! HTTP callback → payload decode → EventDispatcher → Handler → SlackClient
//!                                                      ↓
//!                                   PreferenceStore + Block Kit builders
//! ```
//!
//! # Key Types
//!
//! - `EventDispatcher` - Routes events to the registered handler
//! - `SlackClient` - Outbound Web API surface, faked in tests
//! - `ModalMetadata` - Versioned token round-tripped through modals
//! - `RequestVerifier` - Signature and timestamp checks for inbound requests

pub mod actions;
pub mod blocks;
pub mod client;
pub mod commands;
pub mod events;
pub mod home;
pub mod metadata;
pub mod payload;
pub mod shortcuts;
pub mod signature;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{SlackApiError, SlackClient, WebApiClient};
pub use events::{bot_dispatcher, EventContext, EventDispatcher, SlackEnvelope, SlackEvent};
pub use signature::RequestVerifier;
