//! File-backed implementations of the storage ports.
//!
//! Files live in the platform directories under an `atrium` folder:
//! - session: `<config dir>/atrium/session.json`
//! - settings cache: `<cache dir>/atrium/settings.json`

mod session_store;
mod settings_cache;

use std::path::Path;

use atrium_application::ports::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::serialization::{from_json_bytes, to_json_file_bytes};

pub use session_store::FileSessionStore;
pub use settings_cache::FileSettingsCache;

/// Folder created inside the platform directories.
pub const APP_DIR: &str = "atrium";

/// Reads a JSON file, returning `None` if it does not exist.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    if !fs::try_exists(path).await? {
        return Ok(None);
    }

    let content = fs::read(path).await?;
    let value =
        from_json_bytes(&content).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(Some(value))
}

/// Writes a value as pretty JSON, creating parent directories.
async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let content =
        to_json_file_bytes(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    fs::write(path, content).await?;
    Ok(())
}
