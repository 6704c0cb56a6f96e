//! Command handlers for CLI operations

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use docqa_core::{AppConfig, Session};
use docqa_providers::openai::ENV_OPENAI_API_KEY;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::cli::Cli;
use crate::interactive::run_tui_interactive;
use crate::ui::AppOptions;

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "docqa_context=info,docqa_providers=info,docqa_cli=info";

/// Handle interactive document Q&A session
///
/// # Errors
/// Returns an error if logging cannot be set up or the TUI fails
pub async fn handle_interactive(cli: Cli) -> Result<()> {
    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    init_logging(&log_path)?;
    install_panic_hook();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::config_path()?,
    };
    let config = load_config(&config_path);

    let env_key = env::var(ENV_OPENAI_API_KEY).ok();
    let session = session_with_key(env_key.as_deref());
    tracing::info!(
        session = %session.id(),
        prefilled_key = session.has_api_key(),
        "Session started"
    );

    run_tui_interactive(AppOptions {
        config: Arc::new(config),
        config_path: Some(config_path),
        session,
        file_format: cli.file_type.into(),
        files: cli.file_field(),
    })
    .await
}

/// Opens the debug log, truncating output from earlier sessions
///
/// # Errors
/// Returns an error if the log directory or file cannot be created
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    writeln!(log_file, "=== Session started at {} ===", Utc::now().to_rfc3339())?;
    Ok(log_file)
}

/// Routes `tracing` output to `path`, since the TUI owns stdout
///
/// # Errors
/// Returns an error if the log file cannot be opened or a subscriber is already set
fn init_logging(path: &Path) -> Result<()> {
    let log_file = open_log_file(path)?;

    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(
            fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .try_init()?;

    Ok(())
}

/// Sends panic reports to the debug log instead of stderr, which the TUI is drawing on
///
/// Parser panics caught during ingestion would otherwise print over the screen.
fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        tracing::error!("Panic: {info}");
    }));
}

/// Loads or creates the configuration at `path`, falling back to defaults
pub fn load_config(path: &Path) -> AppConfig {
    AppConfig::load_or_create(path).unwrap_or_else(|error| {
        tracing::warn!("Failed to load config from {}: {error}", path.display());
        tracing::warn!("Using default configuration");
        AppConfig::default()
    })
}

/// Creates a session, pre-filled with `key` when it is non-empty
pub fn session_with_key(key: Option<&str>) -> Session {
    let mut session = Session::new();
    if let Some(key) = key {
        session.set_api_key(key);
    }
    session
}

/// Default location of the debug log
///
/// # Errors
/// Returns an error if the home directory cannot be determined
pub fn default_log_path() -> Result<PathBuf> {
    Ok(AppConfig::config_dir()?.join("debug.log"))
}
