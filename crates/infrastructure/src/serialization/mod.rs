//! JSON helpers for Atrium's local files.

mod json;

pub use json::*;
