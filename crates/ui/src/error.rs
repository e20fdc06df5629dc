//! UI error types

use atrium_application::HttpClientError;
use thiserror::Error;

/// Errors that prevent the window from starting or running.
#[derive(Debug, Error)]
pub enum UiError {
    /// The Slint platform failed.
    #[error("window error: {0}")]
    Platform(#[from] slint::PlatformError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] HttpClientError),

    /// The runtime thread could not be started.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}
