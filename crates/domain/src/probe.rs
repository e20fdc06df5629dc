//! Test requests ("probes") fired from the endpoint inspector.
//!
//! URL construction follows the catalog's path conventions: a parameter
//! whose `key=` already appears in the path template has its value
//! appended raw, every other parameter goes into the query string.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::session::Credential;
use crate::toast::ToastKind;

/// Header carrying the credential unless configured otherwise.
pub const DEFAULT_CREDENTIAL_HEADER: &str = "X-API-Key";

/// Builds the fully qualified probe URL.
///
/// `origin` must not end with a slash; `path` is the endpoint's path
/// template. Parameters with an empty value are skipped.
///
/// # Errors
///
/// Returns `DomainError::InvalidQuery` if the query pairs cannot be encoded.
pub fn build_probe_url(
    origin: &str,
    path: &str,
    params: &[(String, String)],
) -> DomainResult<String> {
    let mut url = format!("{origin}{path}");
    let mut query: Vec<(&str, &str)> = Vec::new();

    for (key, value) in params {
        if value.is_empty() {
            continue;
        }
        if path.contains(&format!("{key}=")) {
            url.push_str(value);
        } else {
            query.push((key, value));
        }
    }

    if !query.is_empty() {
        let encoded = serde_urlencoded::to_string(&query)
            .map_err(|e| DomainError::InvalidQuery(e.to_string()))?;
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&encoded);
    }

    Ok(url)
}

/// A fully built probe, ready for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Absolute URL.
    pub url: String,
    /// Request headers in send order.
    pub headers: Vec<(String, String)>,
}

impl ProbeRequest {
    /// Builds a GET probe carrying the credential and a JSON content type.
    ///
    /// # Errors
    ///
    /// Propagates URL building errors.
    pub fn build(
        origin: &str,
        path: &str,
        params: &[(String, String)],
        credential_header: &str,
        credential: &Credential,
    ) -> DomainResult<Self> {
        Ok(Self {
            url: build_probe_url(origin, path, params)?,
            headers: vec![
                (
                    credential_header.to_string(),
                    credential.expose().to_string(),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
        })
    }
}

/// Raw HTTP result of a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl ProbeResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// What the inspector shows once a probe settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A JSON response arrived, whatever its status.
    Completed {
        /// HTTP status code.
        status: u16,
        /// Pretty-printed JSON body.
        body: String,
        /// The body's `message` field, unless it is absent or falsy.
        message: Option<String>,
    },
    /// Transport or parse failure.
    Failed {
        /// Error description.
        error: String,
    },
}

impl ProbeOutcome {
    /// Classifies a raw response. Bodies that are not JSON are failures.
    #[must_use]
    pub fn from_response(response: &ProbeResponse) -> Self {
        let value: Value = match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(e) => {
                return Self::Failed {
                    error: format!("invalid JSON response: {e}"),
                };
            }
        };

        let message = value.get("message").and_then(message_text);
        let body = serde_json::to_string_pretty(&value).unwrap_or_else(|_| response.body.clone());

        Self::Completed {
            status: response.status,
            body,
            message,
        }
    }

    /// Wraps a transport error.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Returns true if the status was 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { status, .. } if *status >= 200 && *status < 300)
    }

    /// Text for the response panel.
    #[must_use]
    pub fn panel_text(&self) -> String {
        match self {
            Self::Completed { body, .. } => body.clone(),
            Self::Failed { error } => format!("Error: {error}"),
        }
    }

    /// Toast severity and message announcing the outcome.
    #[must_use]
    pub fn notice(&self) -> (ToastKind, String) {
        match self {
            Self::Completed { .. } if self.is_success() => {
                (ToastKind::Success, "API test successful".to_string())
            }
            Self::Completed { message, .. } => (
                ToastKind::Error,
                format!(
                    "API test failed: {}",
                    message.as_deref().unwrap_or("Unknown error")
                ),
            ),
            Self::Failed { error } => (ToastKind::Error, format!("API test failed: {error}")),
        }
    }
}

/// Text of a `message` field. Null, `false`, zero and `""` count as absent.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON) => None,
        other => Some(other.to_string()),
    }
}
