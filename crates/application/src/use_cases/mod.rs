//! Application use cases (business logic orchestration).

mod load_settings;
mod run_probe;

pub use load_settings::*;
pub use run_probe::*;
