//! Interactive mode functionality - TUI mode

use anyhow::Result;

use crate::ui::{AppOptions, TuiApp};

/// Run the TUI session until the user quits
///
/// Raw mode is disabled again even when the event loop fails.
///
/// # Errors
/// Returns an error if the terminal cannot be set up or the event loop fails.
pub async fn run_tui_interactive(options: AppOptions) -> Result<()> {
    let mut tui_app = TuiApp::new(options)?;

    TuiApp::enable_raw_mode()?;
    let outcome = tui_app.run_event_loop().await;
    tui_app.disable_raw_mode()?;
    outcome?;

    tracing::info!("Session ended");
    Ok(())
}
