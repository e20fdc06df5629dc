//! Atrium API portal - Main Entry Point
//!
//! Loads configuration, installs logging and runs the portal window until
//! it is closed.

use atrium_infrastructure::PortalConfig;
use atrium_ui::AppWindow;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PortalConfig::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        origin = %config.origin,
        settings_path = %config.settings_path,
        "Starting Atrium v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = AppWindow::new(&config)?;

    // Blocks until the window closes
    app.run()?;

    Ok(())
}
