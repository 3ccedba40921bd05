//! Slack chat backend.
//!
//! Layered bottom-up: [`transport`] speaks HTTP and buffers real-time
//! events, [`client`] adds retry and pagination policy on top of it,
//! [`events`] reduces raw real-time frames to direct messages, and
//! [`adapter`] assembles the three into the crate-level [`Chat`]
//! capability.
//!
//! [`Chat`]: crate::chat::Chat

pub mod adapter;
pub mod client;
pub mod events;
pub mod transport;

pub use adapter::SlackChat;
pub use client::{ApiClient, Member, MemberProfile, RATE_LIMIT_SLEEP, RATE_LIMIT_TRIES};
pub use events::{filter_direct_messages, RawEvent, DIRECT_CHANNEL_PREFIX};
pub use transport::{ApiResponse, EventSink, HttpTransport, Transport, TransportError};
