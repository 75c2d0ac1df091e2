//! Inbound chat events.
//!
//! A OneBot v11 gateway posts every event it sees to the bot's HTTP endpoint.
//! Only message events carry the fields Herald cares about; everything else
//! (heartbeats, notices, requests) deserializes into an [`InboundEvent`] with
//! no text, which the dispatcher ignores.
//!
//! ```text
//! {
//!   "post_type": "message",
//!   "message_type": "group",
//!   "message_id": 1024,
//!   "user_id": 10001,
//!   "group_id": 20002,
//!   "raw_message": "/echo hi",
//!   "sender": { "user_id": 10001, "nickname": "alice" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::gateway::ReplyTarget;

/// Message sender information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Nickname.
    #[serde(default)]
    pub nickname: Option<String>,
}

/// One chat event as delivered by the gateway.
///
/// The event is immutable once parsed. Absence of `group_id` means the
/// message arrived in a private chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Post type discriminator ("message", "notice", "meta_event", ...).
    #[serde(default)]
    pub post_type: String,
    /// Raw message string (CQ codes, HTML-entity escaped).
    #[serde(rename = "raw_message", default)]
    pub text: Option<String>,
    /// Sender's user ID.
    #[serde(rename = "user_id", default)]
    pub sender_id: i64,
    /// Group ID for group messages.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Message ID, quoted by replies.
    #[serde(default)]
    pub message_id: i64,
    /// Sender information.
    #[serde(default)]
    pub sender: Sender,
}

impl InboundEvent {
    /// Parses an event from a raw JSON body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Creates a private message event.
    pub fn private(sender_id: i64, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            post_type: "message".to_string(),
            text: Some(text.into()),
            sender_id,
            group_id: None,
            message_id,
            sender: Sender {
                user_id: Some(sender_id),
                nickname: None,
            },
        }
    }

    /// Moves this event into a group chat.
    pub fn in_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Sets the sender nickname.
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.sender.nickname = Some(nickname.into());
        self
    }

    /// Returns the message text, treating an empty string as no text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Returns the sender's nickname, or an empty string when unknown.
    pub fn sender_nickname(&self) -> &str {
        self.sender.nickname.as_deref().unwrap_or_default()
    }

    /// Returns `true` if the event came from a group chat.
    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }

    /// Returns where a reply to this event should be delivered.
    pub fn reply_target(&self) -> ReplyTarget {
        match self.group_id {
            Some(group_id) => ReplyTarget::Group(group_id),
            None => ReplyTarget::Private(self.sender_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_message() {
        let body = br#"{
            "post_type": "message",
            "message_type": "group",
            "time": 1700000000,
            "self_id": 42,
            "message_id": 1024,
            "user_id": 10001,
            "group_id": 20002,
            "message": [],
            "raw_message": "/echo hi",
            "font": 0,
            "sender": { "user_id": 10001, "nickname": "alice", "role": "member" }
        }"#;

        let event = InboundEvent::from_slice(body).unwrap();
        assert_eq!(event.text(), Some("/echo hi"));
        assert_eq!(event.sender_id, 10001);
        assert_eq!(event.message_id, 1024);
        assert_eq!(event.sender_nickname(), "alice");
        assert_eq!(event.reply_target(), ReplyTarget::Group(20002));
    }

    #[test]
    fn test_parse_private_message() {
        let body = br#"{"post_type":"message","message_id":7,"user_id":5,"raw_message":"hey"}"#;
        let event = InboundEvent::from_slice(body).unwrap();
        assert!(!event.is_group());
        assert_eq!(event.reply_target(), ReplyTarget::Private(5));
        assert_eq!(event.sender_nickname(), "");
    }

    #[test]
    fn test_meta_event_has_no_text() {
        let body = br#"{"post_type":"meta_event","meta_event_type":"heartbeat","time":1,"self_id":42}"#;
        let event = InboundEvent::from_slice(body).unwrap();
        assert_eq!(event.text(), None);
    }

    #[test]
    fn test_empty_text_is_no_text() {
        let event = InboundEvent::private(1, 1, "");
        assert_eq!(event.text(), None);
    }
}
