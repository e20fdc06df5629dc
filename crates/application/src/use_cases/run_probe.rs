//! Run probe use case
//!
//! Sends a test request built by the inspector and reports what came back.

use std::sync::Arc;

use atrium_domain::{ProbeOutcome, ProbeRequest, ProbeResponse};
use thiserror::Error;

use crate::ports::{CancellationReceiver, HttpClient, HttpClientError};

/// Result type for probe execution.
pub type ProbeResult = Result<ProbeResponse, ProbeError>;

/// Error type for the run probe use case.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The probe URL is not absolute.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed.
    #[error("{0}")]
    HttpError(#[from] HttpClientError),
}

impl ProbeError {
    /// Returns true if the probe was cancelled rather than failed.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::HttpError(HttpClientError::Cancelled))
    }
}

/// Use case for executing probes.
pub struct RunProbe<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> RunProbe<C> {
    /// Creates a new `RunProbe` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Executes the probe.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` on validation or transport failures. Non-2xx
    /// statuses are not errors.
    pub async fn execute(&self, request: &ProbeRequest) -> ProbeResult {
        Self::validate(request)?;
        let response = self.client.get(&request.url, &request.headers).await?;
        Ok(response.into())
    }

    /// Executes the probe, racing it against cancellation.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientError::Cancelled` (wrapped) when cancelled first.
    pub async fn execute_with_cancellation(
        &self,
        request: &ProbeRequest,
        mut cancel: CancellationReceiver,
    ) -> ProbeResult {
        Self::validate(request)?;

        tokio::select! {
            result = self.client.get(&request.url, &request.headers) => {
                result.map(ProbeResponse::from).map_err(ProbeError::from)
            }
            () = cancel.cancelled() => {
                Err(ProbeError::HttpError(HttpClientError::Cancelled))
            }
        }
    }

    fn validate(request: &ProbeRequest) -> Result<(), ProbeError> {
        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            return Err(ProbeError::InvalidUrl(request.url.clone()));
        }
        Ok(())
    }
}

/// Extension trait turning a probe result into what the inspector shows.
pub trait ProbeResultExt {
    /// Converts the result to a `ProbeOutcome`.
    fn into_outcome(self) -> ProbeOutcome;
}

impl ProbeResultExt for ProbeResult {
    fn into_outcome(self) -> ProbeOutcome {
        match self {
            Ok(response) => ProbeOutcome::from_response(&response),
            Err(e) => ProbeOutcome::failed(e.to_string()),
        }
    }
}
