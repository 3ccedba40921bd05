//! Real-time event wire shape and the direct-message filter.
//!
//! The transport buffers whatever the real-time feed delivers — messages,
//! presence changes, typing indicators, channel lifecycle noise. Only
//! well-formed direct messages matter to the bot; everything else is
//! dropped here, silently, with no log obligation at this layer.

use serde::{Deserialize, Serialize};

use crate::chat::DirectMessage;

/// Channel-id prefix marking a one-to-one conversation.
///
/// Group and multi-party channels carry other prefixes and are never
/// surfaced to the bot.
pub const DIRECT_CHANNEL_PREFIX: &str = "D";

/// Type tag of plain message events on the real-time feed.
const MESSAGE_EVENT_TYPE: &str = "message";

/// A raw real-time event as drained from the transport.
///
/// Models only the fields the filter inspects; whatever else the backend
/// attaches is ignored on deserialization. All fields are optional because
/// the feed mixes event shapes freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event type tag (`message`, `presence_change`, ...).
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    /// Channel id the event relates to, when any.
    #[serde(default)]
    pub channel: Option<String>,
    /// Id of the user who produced the event, when any.
    #[serde(default)]
    pub user: Option<String>,
    /// Message text, when any.
    #[serde(default)]
    pub text: Option<String>,
}

impl RawEvent {
    /// Build a plain message event. Convenience for hosts and tests that
    /// assemble events by hand rather than deserializing frames.
    pub fn message(user: &str, channel: &str, text: &str) -> Self {
        Self {
            event_type: Some(MESSAGE_EVENT_TYPE.to_string()),
            channel: Some(channel.to_string()),
            user: Some(user.to_string()),
            text: Some(text.to_string()),
        }
    }
}

/// Keep only well-formed direct messages, preserving relative order.
///
/// An event survives when its type tag is `message`, it names a sending
/// user, and its channel id starts with [`DIRECT_CHANNEL_PREFIX`]. Events
/// failing any predicate are dropped without error.
pub fn filter_direct_messages(events: Vec<RawEvent>) -> Vec<DirectMessage> {
    events.into_iter().filter_map(into_direct_message).collect()
}

/// Convert one raw event into a direct message, or `None` when it fails a
/// predicate. The text field is not examined; a qualifying event without
/// text yields an empty string.
fn into_direct_message(event: RawEvent) -> Option<DirectMessage> {
    if event.event_type.as_deref() != Some(MESSAGE_EVENT_TYPE) {
        return None;
    }
    let user = event.user.filter(|user| !user.is_empty())?;
    let channel = event
        .channel
        .filter(|channel| channel.starts_with(DIRECT_CHANNEL_PREFIX))?;
    Some(DirectMessage {
        user,
        text: event.text.unwrap_or_default(),
        channel,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
