//! # Herald Transport
//!
//! HTTP plumbing between a OneBot v11 gateway and the Herald dispatcher.
//!
//! ## Features
//!
//! - `http-server` (default): receives event callbacks ([`listen`])
//! - `http-client` (default): calls the gateway's HTTP API ([`HttpGateway`])
//! - `full`: both
//!
//! ```text
//! gateway ──POST event──▶ http::server ──▶ EventSink (Dispatcher)
//!    ▲                                          │
//!    └────POST /send_*_msg── http::client ◀─────┘
//! ```

pub mod error;

#[cfg(any(feature = "http-client", feature = "http-server"))]
pub mod http;

pub use error::{TransportError, TransportResult};

#[cfg(feature = "http-client")]
pub use http::HttpGateway;

#[cfg(feature = "http-server")]
pub use http::{ListenerHandle, listen};
