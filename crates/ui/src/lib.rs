//! Atrium UI - User interface layer
//!
//! This crate provides the Slint-based user interface for the Atrium API portal.

// Allow lints that trigger on Slint-generated code which we cannot control
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]

mod app_window;
pub mod bridge;
mod error;
pub mod runtime;

pub use app_window::AppWindow;
pub use bridge::{UiCommand, UiUpdate};
pub use error::UiError;
pub use runtime::{PortalRuntime, PortalServices};

// Include the generated Slint code
slint::include_modules!();
