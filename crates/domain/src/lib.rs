//! Atrium Domain - Core portal types
//!
//! This crate defines the domain model for the Atrium API portal.
//! All types here are pure Rust with no I/O dependencies.

pub mod catalog;
pub mod document;
pub mod error;
pub mod inspector;
pub mod probe;
pub mod session;
pub mod state;
pub mod toast;

pub use catalog::{CardView, CatalogView, CategoryView};
pub use document::{Category, Endpoint, EndpointStatus, HeaderInfo, SettingsDocument};
pub use error::{DomainError, DomainResult};
pub use inspector::{InspectorState, ParamInput, Selection};
pub use probe::{
    DEFAULT_CREDENTIAL_HEADER, ProbeOutcome, ProbeRequest, ProbeResponse, build_probe_url,
};
pub use session::{Credential, Session, ThemeMode};
pub use state::ProbeState;
pub use toast::{TOAST_DURATION, Toast, ToastKind, ToastState};
