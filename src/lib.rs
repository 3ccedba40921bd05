//! Slackline — a resilient Slack adapter for security chatbots.
//!
//! Wraps the Slack Web API behind the exchange-agnostic [`chat::Chat`]
//! capability: user directory listing, direct-message delivery, and a
//! real-time event feed reduced to the direct messages a bot cares about.
//! Rate-limited calls are retried on a fixed cadence; other rejections are
//! logged and kept out of the caller's way.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub mod chat;
pub mod slack;
