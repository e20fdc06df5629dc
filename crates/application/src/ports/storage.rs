//! Storage ports
//!
//! The portal keeps two small pieces of local state: the session
//! (credential and theme) and the last settings document fetched, used
//! to show the catalog while offline.

use async_trait::async_trait;
use atrium_domain::{Session, SettingsDocument};

/// Errors that can occur during local storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No platform directory is available for the file.
    #[error("Could not determine storage directory")]
    NoStorageDir,
}

/// Port for persisting the session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the stored session.
    ///
    /// Returns the default session if nothing has been stored yet.
    async fn load(&self) -> Result<Session, StorageError>;

    /// Stores the session, replacing the previous one.
    ///
    /// # Errors
    /// Returns an error if the session cannot be written.
    async fn save(&self, session: &Session) -> Result<(), StorageError>;
}

/// Port for the offline copy of the settings document.
#[async_trait]
pub trait SettingsCache: Send + Sync {
    /// Loads the cached document, if one exists.
    async fn load(&self) -> Result<Option<SettingsDocument>, StorageError>;

    /// Replaces the cached document.
    ///
    /// # Errors
    /// Returns an error if the document cannot be written.
    async fn store(&self, document: &SettingsDocument) -> Result<(), StorageError>;
}
