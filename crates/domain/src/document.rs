//! Settings document served by the portal's configuration endpoint.
//!
//! The document describes the API being documented (name, version, status)
//! and its catalog of endpoints grouped into categories. Every field is
//! optional on the wire; accessors fall back to display defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Portal name shown when the document does not provide one.
pub const DEFAULT_NAME: &str = "API Portal";
/// Description shown when the document does not provide one.
pub const DEFAULT_DESCRIPTION: &str = "Simple and powerful APIs for everyone";
/// Status shown when the document has no header status.
pub const DEFAULT_STATUS: &str = "Active";
/// Version shown when the document does not provide one.
pub const DEFAULT_VERSION: &str = "v1.0.0";

/// The settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDocument {
    /// Portal / API name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short description of the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Header block carrying the service status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderInfo>,
    /// Ordered endpoint categories.
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Header block of the settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Service status label (e.g. "Active").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A named group of endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Endpoints in display order.
    #[serde(default)]
    pub items: Vec<Endpoint>,
}

/// One documented API route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Display name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub desc: String,
    /// Path template, relative to the portal origin (may carry a query).
    pub path: String,
    /// Availability status.
    #[serde(default)]
    pub status: EndpointStatus,
    /// Declared parameters: name to description.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// Availability of an endpoint.
///
/// Only the literal `"ready"` marks an endpoint as ready; any other value,
/// or no value at all, is kept verbatim as a not-ready status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EndpointStatus {
    /// The endpoint is live.
    Ready,
    /// Any other status string.
    Other(String),
}

impl Default for EndpointStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for EndpointStatus {
    fn from(value: String) -> Self {
        if value == "ready" {
            Self::Ready
        } else {
            Self::Other(value)
        }
    }
}

impl From<EndpointStatus> for String {
    fn from(status: EndpointStatus) -> Self {
        match status {
            EndpointStatus::Ready => "ready".to_string(),
            EndpointStatus::Other(value) => value,
        }
    }
}

impl EndpointStatus {
    /// Returns true for the ready status.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Badge text shown on the endpoint card.
    #[must_use]
    pub const fn badge(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Other(_) => "Maintenance",
        }
    }
}

impl SettingsDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `text` is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Portal name, or the default.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Portal description, or the default.
    #[must_use]
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Header status, or the default.
    #[must_use]
    pub fn display_status(&self) -> &str {
        self.header
            .as_ref()
            .and_then(|h| h.status.as_deref())
            .unwrap_or(DEFAULT_STATUS)
    }

    /// Version label, or the default.
    #[must_use]
    pub fn display_version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Total number of endpoints across all categories.
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Looks up an endpoint by category and item index.
    #[must_use]
    pub fn endpoint(&self, category: usize, endpoint: usize) -> Option<&Endpoint> {
        self.categories.get(category)?.items.get(endpoint)
    }
}

impl Endpoint {
    /// Returns true if the endpoint declares any parameters.
    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}
