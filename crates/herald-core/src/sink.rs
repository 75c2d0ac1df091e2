//! The inbound side of the bot.

use std::sync::Arc;

use async_trait::async_trait;

use crate::event::InboundEvent;

/// Consumes events received by a transport.
///
/// The transport acknowledges the gateway independently of the outcome, so
/// sinks have nothing to return.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Processes one event.
    async fn on_event(&self, event: InboundEvent);
}

/// A shared, type-erased event sink.
pub type BoxedEventSink = Arc<dyn EventSink>;
