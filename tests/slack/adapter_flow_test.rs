//! End-to-end flows through the public `Chat` capability.

use std::sync::Arc;

use serde_json::json;

use slackline::chat::{Chat, ChatError};
use slackline::slack::{RawEvent, SlackChat, Transport};

use crate::fixtures::{identity, member, RecordingTransport};

fn chat_over(transport: &Arc<RecordingTransport>) -> SlackChat {
    SlackChat::new(identity(), Arc::clone(transport) as Arc<dyn Transport>)
}

fn session_script() -> Vec<serde_json::Value> {
    vec![
        // validate
        json!({"ok": true}),
        // users.list, two pages
        json!({
            "ok": true,
            "members": [member("U1", "alice", false), member("U2", "bob", true)],
            "response_metadata": {"next_cursor": "page-2"},
        }),
        json!({
            "ok": true,
            "members": [member("U3", "carol", false)],
            "response_metadata": {"next_cursor": ""},
        }),
        // message_user: open channel, then deliver
        json!({"ok": true, "channel": {"id": "D99"}}),
        json!({"ok": true}),
    ]
}

#[tokio::test]
async fn full_session_flow() {
    let transport = RecordingTransport::scripted(session_script());
    let chat = chat_over(&transport);

    chat.validate().await.expect("validate");
    chat.connect().await.expect("connect");

    let users = chat.list_users().await.expect("list users");
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["alice", "carol"], "deactivated members are dropped");
    assert_eq!(users[0].profile.email.as_deref(), Some("alice@example.com"));

    transport.feed(RawEvent::message("U1", "D77", "need an exception"));
    transport.feed(RawEvent::message("U9", "C11", "channel chatter"));
    transport.feed(RawEvent {
        event_type: Some("user_typing".to_string()),
        channel: Some("D77".to_string()),
        user: Some("U1".to_string()),
        ..RawEvent::default()
    });

    let messages = chat.get_messages().await.expect("messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].user, "U1");
    assert_eq!(messages[0].channel, "D77");
    assert_eq!(messages[0].text, "need an exception");

    chat.message_user("U3", "confirmed, closing alert").await.expect("message user");

    assert_eq!(
        transport.methods(),
        ["api.test", "users.list", "users.list", "im.open", "chat.postMessage"]
    );

    let calls = transport.calls();
    let (_, delivery) = calls.last().expect("delivery call");
    assert_eq!(delivery["channel"], json!("D99"));
    assert_eq!(delivery["text"], json!("confirmed, closing alert"));
    assert_eq!(delivery["username"], json!("securitybot"));
    assert_eq!(delivery["as_user"], json!(false));
    assert_eq!(delivery["icon_url"], json!("https://example.com/securitybot.png"));
}

#[tokio::test]
async fn feed_is_consumed_in_arrival_order() {
    let transport = RecordingTransport::scripted(Vec::new());
    let chat = chat_over(&transport);

    transport.feed(RawEvent::message("U1", "D1", "first"));
    transport.feed(RawEvent::message("U2", "D2", "second"));

    let messages = chat.get_messages().await.expect("messages");
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["first", "second"]);

    assert!(chat.get_messages().await.expect("drained").is_empty());
}

#[tokio::test]
async fn identical_scripts_produce_identical_sessions() {
    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let transport = RecordingTransport::scripted(session_script());
        let chat = chat_over(&transport);

        chat.validate().await.expect("validate");
        let users = chat.list_users().await.expect("list users");
        transport.feed(RawEvent::message("U1", "D77", "hello"));
        let messages = chat.get_messages().await.expect("messages");

        outcomes.push((users, messages, transport.methods()));
    }

    assert_eq!(outcomes[0], outcomes[1]);
}

#[tokio::test]
async fn refused_handshake_is_a_session_error() {
    let transport = RecordingTransport::refusing_handshake();
    let chat = chat_over(&transport);

    let err = chat.connect().await.expect_err("should fail");
    assert!(matches!(err, ChatError::SessionFailed));
    assert_eq!(err.to_string(), "unable to start session");
}

#[tokio::test]
async fn http_transport_feed_works_without_network() {
    // Events only travel through the in-process buffer, so an unreachable
    // base URL is never contacted.
    let (chat, sink) = SlackChat::over_http_at(identity(), "http://127.0.0.1:1/api");

    sink.push(RawEvent::message("U5", "D5", "over http"));
    sink.push(RawEvent::message("U5", "C5", "not direct"));

    let messages = chat.get_messages().await.expect("messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "over http");
}
