//! Tracing setup for the `geli` binary
//!
//! Logging is configured from the config file, so the file is loaded under a
//! temporary stderr subscriber first. Diagnostics from config resolution (a
//! missing file, the path that was loaded) are not lost that way.

use std::path::Path;

use anyhow::{Context, Result};
use geli_common::config::{load_or_default, LoggingConfig, TomlConfig};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Level used before the config file has been read
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Default filter: the binary and both workspace crates at `level`
pub fn filter_directive(level: &str) -> String {
    format!("geli={0},geli_ui={0},geli_common={0}", level)
}

/// `RUST_LOG` if set, otherwise [`filter_directive`]
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)))
}

/// Subscriber used while the config file is being resolved
pub fn bootstrap_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(BOOTSTRAP_LEVEL))
        .with_writer(writer)
        .finish()
}

/// Resolve and load the config with config diagnostics going to stderr
pub fn load_config(cli_arg: Option<&Path>) -> geli_common::Result<TomlConfig> {
    tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), || {
        load_or_default(cli_arg)
    })
}

/// Install the global subscriber described by `[logging]`
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = env_filter(&logging.level);

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
