//! HTTP client and server.

#[cfg(feature = "http-client")]
mod client;
#[cfg(feature = "http-client")]
pub use client::{DEFAULT_TIMEOUT, HttpGateway};

#[cfg(feature = "http-server")]
mod server;
#[cfg(feature = "http-server")]
pub use server::{ListenerHandle, listen};
