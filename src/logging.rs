use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;

/// Send log output to `sso-cli.log` next to the tool config (truncated on each run).
///
/// `RUST_LOG` wins over the default level; `verbose` raises the default to debug.
pub fn init(verbose: bool) -> Result<()> {
    let dir = Config::config_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory: {:?}", dir))?;

    let log_path = dir.join("sso-cli.log");
    let log_file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {:?}", log_path))?;

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(())
}
