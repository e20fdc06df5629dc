//! Session persistence.
//!
//! Stores the credential and theme preference in the platform-specific
//! config directory:
//! - Linux: ~/.config/atrium/session.json
//! - macOS: ~/Library/Application Support/atrium/session.json
//! - Windows: %APPDATA%/atrium/session.json

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use atrium_application::ports::{SessionStore, StorageError};
use atrium_domain::Session;

use super::{APP_DIR, read_json, write_json};

const SESSION_FILE: &str = "session.json";

/// Session store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: Option<PathBuf>,
}

impl FileSessionStore {
    /// Creates a store in the platform config directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: dirs::config_dir().map(|p| p.join(APP_DIR).join(SESSION_FILE)),
        }
    }

    /// Creates a store at an explicit path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the path where the session is stored, if available.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Session, StorageError> {
        let Some(path) = &self.path else {
            return Ok(Session::default());
        };
        Ok(read_json(path).await?.unwrap_or_default())
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::NoStorageDir)?;
        write_json(path, session).await?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }
}
