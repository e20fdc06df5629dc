//! Offline copy of the settings document.
//!
//! The last document fetched from the settings endpoint is kept in the
//! platform cache directory so the catalog can be shown before, or
//! without, a successful network load.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use atrium_application::ports::{SettingsCache, StorageError};
use atrium_domain::SettingsDocument;

use super::{APP_DIR, read_json, write_json};

const CACHE_FILE: &str = "settings.json";

/// Settings cache backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSettingsCache {
    path: Option<PathBuf>,
}

impl FileSettingsCache {
    /// Creates a cache in the platform cache directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: dirs::cache_dir().map(|p| p.join(APP_DIR).join(CACHE_FILE)),
        }
    }

    /// Creates a cache at an explicit path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the cache file path, if available.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for FileSettingsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsCache for FileSettingsCache {
    async fn load(&self) -> Result<Option<SettingsDocument>, StorageError> {
        match &self.path {
            Some(path) => read_json(path).await,
            None => Ok(None),
        }
    }

    async fn store(&self, document: &SettingsDocument) -> Result<(), StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::NoStorageDir)?;
        write_json(path, document).await
    }
}
