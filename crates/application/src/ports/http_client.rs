//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use atrium_domain::ProbeResponse;
use thiserror::Error;
use tokio::sync::watch;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl From<HttpResponse> for ProbeResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
        }
    }
}

/// Errors raised by the HTTP client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Host name resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The server refused the connection.
    #[error("Connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Redirect limit reached.
    #[error("Too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The response body could not be read.
    #[error("Failed to read body: {0}")]
    Body(String),

    /// The request was cancelled before completion.
    #[error("Request cancelled")]
    Cancelled,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for issuing GET requests.
///
/// Both network calls of the portal (settings fetch and probes) are plain
/// GETs, so the port only covers that verb.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request with the given headers.
    ///
    /// The response is returned whatever its status; only transport
    /// failures are errors.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError>> + Send + '_>>;
}

/// Cancels an in-flight request.
///
/// Dropping the token without calling `cancel` leaves the request running.
#[derive(Debug)]
pub struct CancellationToken {
    tx: watch::Sender<bool>,
}

/// Receiving half of a `CancellationToken`.
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a token and its receiver.
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> (Self, CancellationReceiver) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancellationReceiver { rx })
    }

    /// Signals cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CancellationReceiver {
    /// Returns true if cancellation was already signalled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is signalled. Never resolves if the
    /// token is dropped first.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
