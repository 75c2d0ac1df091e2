//! # Herald Core
//!
//! Foundation types shared by every Herald crate:
//!
//! - [`InboundEvent`]: the chat event posted by a OneBot v11 gateway
//! - [`Gateway`]: the outbound side, used to reply and to call gateway APIs
//! - [`EventSink`]: the inbound side, fed by a transport
//! - CQ code helpers for escaping, reply quoting and at-mentions
//! - Error types for gateway calls
//!
//! Nothing in this crate performs I/O; concrete gateways live in
//! `herald-transport`.

pub mod error;
pub mod event;
pub mod gateway;
pub mod message;
pub mod sink;

pub use error::{GatewayError, GatewayResult};
pub use event::{InboundEvent, Sender};
pub use gateway::{BoxedGateway, Gateway, ReplyTarget};
pub use message::{is_exact_mention, mention_id, quote_reply, reply_tag, unescape_cq_text};
pub use sink::{BoxedEventSink, EventSink};
