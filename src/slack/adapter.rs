//! Slack rendition of the [`Chat`] capability.
//!
//! [`SlackChat`] binds a bot identity to an [`ApiClient`] and a
//! [`Transport`]. Web API traffic goes through the client's retry policy;
//! real-time traffic arrives through the transport's event buffer and is
//! reduced to direct messages on drain.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::client::ApiClient;
use super::events::filter_direct_messages;
use super::transport::{EventSink, HttpTransport, Transport};
use crate::chat::{Chat, ChatError, ChatUser, DirectMessage};
use crate::config::BotIdentity;

/// Payload of a successful `im.open` answer.
#[derive(Debug, Deserialize)]
struct ImOpenPayload {
    #[serde(default)]
    channel: Option<DirectChannel>,
}

/// Channel handle inside an `im.open` payload.
#[derive(Debug, Deserialize)]
struct DirectChannel {
    #[serde(default)]
    id: String,
}

/// Chat adapter speaking the Slack Web API.
pub struct SlackChat {
    identity: BotIdentity,
    client: ApiClient,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for SlackChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackChat")
            .field("identity", &self.identity)
            .finish()
    }
}

impl SlackChat {
    /// Build an adapter over an arbitrary transport.
    pub fn new(identity: BotIdentity, transport: Arc<dyn Transport>) -> Self {
        let client = ApiClient::new(Arc::clone(&transport));
        Self {
            identity,
            client,
            transport,
        }
    }

    /// Build an adapter over the production HTTP transport.
    ///
    /// Returns the adapter together with the [`EventSink`] the host's
    /// socket pump feeds real-time frames into.
    pub fn over_http(identity: BotIdentity) -> (Self, EventSink) {
        let transport = Arc::new(HttpTransport::new(identity.token.clone()));
        let sink = transport.event_sink();
        (Self::new(identity, transport), sink)
    }

    /// Build an adapter over HTTP against a non-default API base URL.
    pub fn over_http_at(identity: BotIdentity, base_url: impl Into<String>) -> (Self, EventSink) {
        let transport = Arc::new(HttpTransport::with_base_url(identity.token.clone(), base_url));
        let sink = transport.event_sink();
        (Self::new(identity, transport), sink)
    }
}

#[async_trait]
impl Chat for SlackChat {
    async fn validate(&self) -> Result<(), ChatError> {
        let response = self.client.call("api.test", json!({})).await?;
        if response.ok() {
            info!("api connectivity validated");
            Ok(())
        } else {
            Err(ChatError::ConnectionFailed)
        }
    }

    async fn connect(&self) -> Result<(), ChatError> {
        if self.transport.handshake().await? {
            info!("real-time session established");
            Ok(())
        } else {
            Err(ChatError::SessionFailed)
        }
    }

    async fn list_users(&self) -> Result<Vec<ChatUser>, ChatError> {
        let members = self.client.list_all_members("users.list").await?;
        Ok(members.into_iter().map(ChatUser::from).collect())
    }

    async fn get_messages(&self) -> Result<Vec<DirectMessage>, ChatError> {
        let events = self.transport.drain_events();
        Ok(filter_direct_messages(events))
    }

    async fn send_message(&self, channel: &str, text: &str) -> Result<(), ChatError> {
        let params = json!({
            "channel": channel,
            "text": text,
            "username": self.identity.username,
            "as_user": false,
            "icon_url": self.identity.icon_url,
        });
        self.client.call("chat.postMessage", params).await?;
        Ok(())
    }

    async fn message_user(&self, user_id: &str, text: &str) -> Result<(), ChatError> {
        let response = self.client.call("im.open", json!({ "user": user_id })).await?;
        if !response.ok() {
            return Err(ChatError::ChannelResolution(user_id.to_string()));
        }

        let channel = response
            .parse::<ImOpenPayload>()
            .ok()
            .and_then(|payload| payload.channel)
            .map(|channel| channel.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ChatError::ChannelResolution(user_id.to_string()))?;

        self.send_message(&channel, text).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
