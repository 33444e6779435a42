use color_eyre::{eyre::eyre, Result};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "cmts.log";

/// Log directory under the user cache dir, e.g. ~/.cache/cmts/
fn log_dir() -> Result<PathBuf> {
  let dir = dirs::cache_dir()
    .ok_or_else(|| eyre!("Unable to determine user cache directory"))?
    .join("cmts");

  if !dir.exists() {
    fs::create_dir_all(&dir)
      .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;
  }
  Ok(dir)
}

/// Route tracing output to a daily log file; the terminal belongs to the UI.
///
/// Level comes from RUST_LOG, defaulting to info. Keep the returned guard
/// alive for the whole run or buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  let (writer, guard) = match log_dir() {
    Ok(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)),
    // No cache dir: logging is dropped, the app still runs
    Err(_) => tracing_appender::non_blocking(std::io::sink()),
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .with_target(false)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}
