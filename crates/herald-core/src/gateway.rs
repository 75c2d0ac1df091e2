//! The outbound side of the bot.
//!
//! A [`Gateway`] knows how to invoke an action on the messaging platform's
//! HTTP API. Replies are built on top of that: the reply endpoint is chosen
//! from the originating event, and the text is prefixed with a quote of the
//! original message.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::GatewayResult;
use crate::event::InboundEvent;
use crate::message::quote_reply;

/// Where a reply is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTarget {
    /// A group chat, by group ID.
    Group(i64),
    /// A private chat, by user ID.
    Private(i64),
}

impl ReplyTarget {
    /// Returns the gateway action that sends a message to this target.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Group(_) => "send_group_msg",
            Self::Private(_) => "send_private_msg",
        }
    }

    /// Builds the request body for sending `message` to this target.
    pub fn params(&self, message: &str) -> Value {
        match self {
            Self::Group(group_id) => json!({ "group_id": group_id, "message": message }),
            Self::Private(user_id) => json!({ "user_id": user_id, "message": message }),
        }
    }
}

/// A messaging gateway client.
///
/// Implementations must bound every call with a timeout; callers treat any
/// error as a delivery failure to be logged, never retried.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Invokes `action` with a JSON body and returns the response `data`.
    async fn call_api(&self, action: &str, params: Value) -> GatewayResult<Value>;

    /// Replies to `event`, quoting it.
    async fn reply(&self, event: &InboundEvent, text: &str) -> GatewayResult<()> {
        let target = event.reply_target();
        let message = quote_reply(event.message_id, text);
        debug!(target = ?target, len = text.len(), "Sending reply");
        self.call_api(target.action(), target.params(&message))
            .await
            .map(|_| ())
    }
}

/// A shared, type-erased gateway.
pub type BoxedGateway = Arc<dyn Gateway>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_target() {
        let target = ReplyTarget::Group(20002);
        assert_eq!(target.action(), "send_group_msg");
        assert_eq!(
            target.params("[CQ:reply,id=1]hi"),
            json!({ "group_id": 20002, "message": "[CQ:reply,id=1]hi" })
        );
    }

    #[test]
    fn test_private_target() {
        let target = ReplyTarget::Private(10001);
        assert_eq!(target.action(), "send_private_msg");
        assert_eq!(
            target.params("x"),
            json!({ "user_id": 10001, "message": "x" })
        );
    }
}
