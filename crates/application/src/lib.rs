//! Atrium Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - Use case orchestration
//! - The portal controller that owns all view state

pub mod controller;
pub mod ports;
pub mod use_cases;

pub use controller::{DocumentSource, PendingProbe, PortalController, PortalSettings, ProbeTicket};
pub use ports::{
    CancellationReceiver, CancellationToken, HttpClient, HttpClientError, HttpResponse,
    SessionStore, SettingsCache, StorageError,
};
pub use use_cases::{
    LoadSettings, LoadSettingsError, ProbeError, ProbeResult, ProbeResultExt, RunProbe,
};
