//! Chat platform abstraction: capability trait, core types, and errors.
//!
//! [`Chat`] is the uniform surface a bot programs against — validate the
//! connection, start a real-time session, enumerate users, pull new direct
//! messages, send replies. [`crate::slack::SlackChat`] is the Slack-backed
//! implementation; further platforms are additional variants behind the
//! same trait, not subclasses of it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Hard failures of a chat adapter operation.
///
/// Soft backend rejections (an `ok: false` response outside the explicit
/// validate/connect checks) are *not* represented here: they are logged and
/// swallowed so callers keep best-effort semantics. See the crate docs for
/// the soft/hard failure split.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The connectivity test endpoint reported failure.
    #[error("unable to connect")]
    ConnectionFailed,

    /// The real-time session handshake was refused.
    #[error("unable to start session")]
    SessionFailed,

    /// The rate-limit retry ceiling was reached without getting through.
    #[error("rate limit max tries reached")]
    RateLimitExhausted,

    /// No direct-message channel could be resolved for the user.
    #[error("unable to open direct message channel to {0}")]
    ChannelResolution(String),

    /// Failure below the adapter: network, HTTP status, malformed body.
    /// Not classified further; unrecoverable from the caller's view.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// A platform user, as returned by [`Chat::list_users`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    /// Unique id of the user on the platform.
    pub id: String,
    /// Username of the user.
    pub name: String,
    /// Profile details.
    pub profile: UserProfile,
}

/// Profile details attached to a [`ChatUser`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// First name, when the platform knows it.
    pub first_name: Option<String>,
    /// Full real name, when set.
    pub real_name: Option<String>,
    /// Email address, when visible to the bot.
    pub email: Option<String>,
}

/// A direct message received by the bot.
///
/// Transient: exists between the event drain and hand-off to the bot's
/// message processing. One value is one direct message; no batching or
/// threading semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    /// Unique id of the sending user. Never empty.
    pub user: String,
    /// Message text. Empty when the event carried none.
    pub text: String,
    /// Direct-channel id the message arrived on; usable as the reply
    /// target for [`Chat::send_message`].
    pub channel: String,
}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// Capability set of a chat platform adapter.
///
/// One implementation per platform. Operations are not designed for
/// concurrent invocation against the same adapter instance; callers
/// serialize externally when needed.
#[async_trait]
pub trait Chat: Send + Sync {
    /// Run the backend connectivity test.
    ///
    /// Must be invoked once after construction before any other operation
    /// is trusted.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ConnectionFailed`] when the backend rejects
    /// the test, or [`ChatError::Transport`] when it cannot be reached.
    async fn validate(&self) -> Result<(), ChatError>;

    /// Start the real-time session.
    ///
    /// Calling twice performs a re-handshake; idempotency is not
    /// guaranteed.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionFailed`] on handshake refusal.
    async fn connect(&self) -> Result<(), ChatError>;

    /// List all current (non-deleted) users known to the platform.
    ///
    /// Results are fetched fresh on every call, never cached.
    ///
    /// # Errors
    ///
    /// Propagates hard failures from the underlying call layer.
    async fn list_users(&self) -> Result<Vec<ChatUser>, ChatError>;

    /// Return the direct messages buffered since the last call.
    ///
    /// Non-blocking: yields whatever the transport currently holds.
    /// Drained events are consumed and never re-delivered. Pace the calls
    /// externally; this is not a waiting primitive.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from implementations that need the
    /// wire to drain; the Slack variant reads a local buffer and does not
    /// fail.
    async fn get_messages(&self) -> Result<Vec<DirectMessage>, ChatError>;

    /// Send `text` to a channel.
    ///
    /// Best-effort: a backend rejection (`ok: false`) is logged and
    /// swallowed, so `Ok(())` means "handed to the backend", not
    /// "delivered".
    ///
    /// # Errors
    ///
    /// Returns an error only for hard failures (transport, exhausted
    /// rate-limit retries).
    async fn send_message(&self, channel: &str, text: &str) -> Result<(), ChatError>;

    /// Open the direct channel to `user_id` and send `text` there.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ChannelResolution`] when no direct channel
    /// could be opened. The send step itself stays best-effort, as with
    /// [`Chat::send_message`].
    async fn message_user(&self, user_id: &str, text: &str) -> Result<(), ChatError>;
}
