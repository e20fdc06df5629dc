//! Atrium Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::ReqwestHttpClient;
pub use self::config::{ConfigError, PortalConfig};
pub use persistence::{FileSessionStore, FileSettingsCache};
pub use serialization::{SerializationError, from_json_bytes, to_json_file_bytes};
