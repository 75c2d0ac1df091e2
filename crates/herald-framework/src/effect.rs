//! Side effects requested by handlers.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// One side effect a handler asks the dispatcher to perform.
///
/// Effects run in the order they are returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Reply to the originating chat, quoting the message.
    Reply(String),
    /// Enable or disable a registered command.
    SetEnabled {
        /// Target command prefix.
        prefix: String,
        /// New state.
        enabled: bool,
    },
    /// Grant `prefix` to each user and persist the privilege document.
    Grant {
        /// Users receiving the grant.
        users: Vec<i64>,
        /// Command prefix being granted.
        prefix: String,
    },
    /// Revoke `prefix` from each user and persist the privilege document.
    Revoke {
        /// Users losing the grant.
        users: Vec<i64>,
        /// Command prefix being revoked.
        prefix: String,
    },
    /// Call a gateway action; the response is discarded.
    CallApi {
        /// Action name, e.g. `"send_like"`.
        action: String,
        /// JSON request body.
        params: Value,
    },
    /// Call a gateway action and hand its `data` to `then`, whose effects
    /// run next, before any effect that follows this one.
    Query {
        /// Action name, e.g. `"get_group_member_list"`.
        action: String,
        /// JSON request body.
        params: Value,
        /// Continuation receiving the response, or `None` if the call failed.
        then: Then,
    },
}

/// The continuation of an [`Effect::Query`].
///
/// Two continuations are equal only if they are the same allocation.
#[derive(Clone)]
pub struct Then(Arc<dyn Fn(Option<Value>) -> Vec<Effect> + Send + Sync>);

impl Then {
    /// Wraps `f`.
    pub fn new(f: impl Fn(Option<Value>) -> Vec<Effect> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Runs the continuation on a response.
    pub fn call(&self, response: Option<Value>) -> Vec<Effect> {
        (self.0)(response)
    }
}

impl PartialEq for Then {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Then {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Then(..)")
    }
}

impl Effect {
    /// Creates a [`Reply`](Self::Reply).
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }

    /// Creates a [`CallApi`](Self::CallApi).
    pub fn call_api(action: impl Into<String>, params: Value) -> Self {
        Self::CallApi {
            action: action.into(),
            params,
        }
    }

    /// Creates a [`Query`](Self::Query).
    pub fn query(
        action: impl Into<String>,
        params: Value,
        then: impl Fn(Option<Value>) -> Vec<Effect> + Send + Sync + 'static,
    ) -> Self {
        Self::Query {
            action: action.into(),
            params,
            then: Then::new(then),
        }
    }
}
