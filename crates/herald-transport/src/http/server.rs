//! Inbound event endpoint.
//!
//! The gateway POSTs every event as JSON. The endpoint always answers
//! `200 OK` with body `OK`, even for bodies it cannot parse; the event is
//! handed to the sink on a separate task so a slow handler never delays
//! the acknowledgement.

use std::net::SocketAddr;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use herald_core::{BoxedEventSink, InboundEvent};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::error::{TransportError, TransportResult};

/// A running listener.
///
/// Dropping the handle stops the server.
pub struct ListenerHandle {
    local_addr: SocketAddr,
    shutdown_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// Returns the bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(mut self) {
        self.shutdown_token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "HTTP server task failed");
            }
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

/// Binds `addr` and serves `POST {path}`, forwarding each event to `sink`.
pub async fn listen(addr: &str, path: &str, sink: BoxedEventSink) -> TransportResult<ListenerHandle> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let router = Router::new()
        .route(&path, post(event_handler))
        .with_state(sink);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!(addr = %local_addr, path = %path, "HTTP server listening");

    let shutdown_token = CancellationToken::new();
    let token = shutdown_token.clone();
    let task = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(token.cancelled_owned())
            .await;
        match result {
            Ok(()) => info!("HTTP server stopped"),
            Err(e) => error!(error = %e, "HTTP server error"),
        }
    });

    Ok(ListenerHandle {
        local_addr,
        shutdown_token,
        task: Some(task),
    })
}

async fn event_handler(State(sink): State<BoxedEventSink>, body: Bytes) -> impl IntoResponse {
    trace!(len = body.len(), "Received HTTP POST");

    match InboundEvent::from_slice(&body) {
        Ok(event) => {
            debug!(
                post_type = %event.post_type,
                sender = event.sender_id,
                "Parsed event"
            );
            tokio::spawn(async move { sink.on_event(event).await });
        }
        Err(e) => warn!(error = %e, "Discarding unparseable event body"),
    }

    (StatusCode::OK, "OK")
}

#[cfg(all(test, feature = "http-client"))]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use herald_core::EventSink;
    use parking_lot::Mutex;
    use tokio::sync::Notify;

    use super::*;

    #[derive(Default)]
    struct CollectingSink {
        events: Mutex<Vec<InboundEvent>>,
        notify: Notify,
    }

    #[async_trait]
    impl EventSink for CollectingSink {
        async fn on_event(&self, event: InboundEvent) {
            self.events.lock().push(event);
            self.notify.notify_one();
        }
    }

    #[tokio::test]
    async fn test_events_are_forwarded_and_acknowledged() {
        let sink = Arc::new(CollectingSink::default());
        let handle = listen("127.0.0.1:0", "/", sink.clone()).await.unwrap();
        let url = format!("http://{}/", handle.local_addr());
        let client = reqwest::Client::new();

        let resp = client
            .post(&url)
            .body(r#"{"post_type":"message","raw_message":"/echo hi","user_id":7,"message_id":1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.text().await.unwrap(), "OK");

        tokio::time::timeout(Duration::from_secs(5), sink.notify.notified())
            .await
            .unwrap();
        let events = sink.events.lock().clone();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text(), Some("/echo hi"));
        assert_eq!(events[0].sender_id, 7);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_garbage_body_still_ok() {
        let sink = Arc::new(CollectingSink::default());
        let handle = listen("127.0.0.1:0", "events", sink.clone()).await.unwrap();
        let url = format!("http://{}/events", handle.local_addr());

        let resp = reqwest::Client::new()
            .post(&url)
            .body("not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.text().await.unwrap(), "OK");
        assert!(sink.events.lock().is_empty());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_bind_error() {
        let sink = Arc::new(CollectingSink::default());
        let result = listen("127.0.0.1", "/", sink).await;
        assert!(matches!(result, Err(TransportError::Bind { .. })));
    }
}
