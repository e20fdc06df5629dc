//! Load settings use case.
//!
//! Fetches the settings document once from the configuration endpoint.
//! There is no retry and no timeout: a single best-effort attempt.

use std::sync::Arc;

use atrium_domain::SettingsDocument;
use thiserror::Error;

use crate::ports::{HttpClient, HttpClientError};

/// Error type for the load settings use case.
#[derive(Debug, Clone, Error)]
pub enum LoadSettingsError {
    /// The request did not complete.
    #[error("{0}")]
    Http(#[from] HttpClientError),

    /// The endpoint answered with a non-2xx status.
    #[error("settings endpoint returned status {0}")]
    Status(u16),

    /// The body is not a settings document.
    #[error("malformed settings document: {0}")]
    Malformed(String),
}

/// Use case for fetching the settings document.
pub struct LoadSettings<C: HttpClient> {
    client: Arc<C>,
    url: String,
}

impl<C: HttpClient> LoadSettings<C> {
    /// Creates the use case for `origin + settings_path`.
    pub fn new(client: Arc<C>, origin: &str, settings_path: &str) -> Self {
        Self {
            client,
            url: format!("{origin}{settings_path}"),
        }
    }

    /// Fetches and parses the document.
    ///
    /// # Errors
    ///
    /// Returns `LoadSettingsError` on transport failure, non-2xx status or
    /// a body that does not parse as a settings document.
    pub async fn execute(&self) -> Result<SettingsDocument, LoadSettingsError> {
        tracing::debug!(url = %self.url, "fetching settings document");

        let response = self.client.get(&self.url, &[]).await?;
        if !response.is_success() {
            return Err(LoadSettingsError::Status(response.status));
        }

        let document = SettingsDocument::from_json(&response.body)
            .map_err(|e| LoadSettingsError::Malformed(e.to_string()))?;
        tracing::info!(
            categories = document.categories.len(),
            endpoints = document.endpoint_count(),
            "settings document loaded"
        );
        Ok(document)
    }
}
