//! HeartGuard: heart disease risk assessment
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;

use heartguard::config::Settings;
use heartguard::logging;
use heartguard::tui::App;

fn main() -> Result<()> {
    let settings = Settings::from_env();

    // Logging to the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let _guard = logging::init(&settings, std::io::stdout().is_terminal())?;

    tracing::info!("Starting HeartGuard...");

    let mut app = App::new(&settings)?;
    app.run()?;

    tracing::info!("HeartGuard shutdown complete.");
    Ok(())
}
