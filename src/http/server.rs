//! HTTP server setup and per-connection handling.
//!
//! # Responsibilities
//! - Build the router from configuration
//! - Accept connections and spawn one task per connection
//! - Parse exactly one request, dispatch it, write exactly one response
//! - Close the connection on every path, including parse failures
//! - Stop accepting on shutdown and wait for in-flight connections

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::ServerConfig;
use crate::http::request::{parse_request, ParseError};
use crate::net::connection::ConnectionTracker;
use crate::net::listener::Listener;
use crate::routing::Router;
use crate::storage::FileStore;

/// Pause after a failed accept so persistent failures (e.g. EMFILE) do not
/// spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Why a connection ended without a response being delivered.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The request could not be parsed; nothing was written.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The response could not be written.
    #[error("failed to write response: {0}")]
    Write(#[from] io::Error),
}

/// HTTP server serving the fixed route table.
pub struct HttpServer {
    router: Arc<Router>,
    tracker: ConnectionTracker,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ServerConfig) -> Self {
        let store = FileStore::new(config.files.directory.clone());
        Self::with_router(Router::new(store))
    }

    pub fn with_router(router: Router) -> Self {
        Self {
            router: Arc::new(router),
            tracker: ConnectionTracker::new(),
        }
    }

    /// Run the accept loop until `shutdown` fires, then wait for in-flight
    /// connections to finish.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(
                address = %addr,
                directory = %self.router.store().directory(),
                "HTTP server starting"
            );
        }

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(stream, peer),
                    Err(e) => {
                        tracing::error!(error = %e, backoff_ms = ACCEPT_BACKOFF.as_millis() as u64, "Accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        self.tracker.wait_idle().await;
        tracing::info!("HTTP server stopped");
    }

    fn spawn_connection<S>(&self, stream: S, peer: SocketAddr)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let router = Arc::clone(&self.router);
        let guard = self.tracker.track();
        let span = tracing::info_span!("connection", connection_id = %guard.id(), peer_addr = %peer);

        tokio::spawn(
            async move {
                match serve_connection(stream, &router).await {
                    Ok(status) => tracing::debug!(status, "Response sent"),
                    Err(ConnectionError::Parse(e)) => {
                        tracing::warn!(error = %e, "Dropping connection, request could not be parsed")
                    }
                    Err(e) => tracing::warn!(error = %e, "Connection failed"),
                }
                drop(guard);
            }
            .instrument(span),
        );
    }
}

/// Serve one request on `stream` and close it.
///
/// Returns the status code that was written. On a parse failure nothing is
/// written and the stream is dropped.
pub async fn serve_connection<S>(stream: S, router: &Router) -> Result<u16, ConnectionError>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);

    let request = parse_request(&mut reader).await?;
    tracing::info!(
        method = %request.method(),
        path = %request.path(),
        protocol = %request.protocol(),
        content_length = request.content_length(),
        "Request received"
    );

    let response = router.dispatch(&request).await;
    let status = response.status();
    response.write_to(&mut writer).await?;
    writer.shutdown().await?;
    Ok(status)
}
