mod api;
mod app;
mod config;
mod event;
mod logging;
mod query;
mod search;
mod timer;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cmts")]
#[command(about = "Search, autocomplete and page through comments in the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./cmts.yaml, then $XDG_CONFIG_HOME/cmts/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Comments endpoint to fetch from
  #[arg(short, long)]
  endpoint: Option<String>,

  /// Comments per page
  #[arg(short = 'n', long)]
  page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init()?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line wins over the file
  if let Some(endpoint) = args.endpoint {
    config.endpoint = endpoint;
  }
  if let Some(page_size) = args.page_size {
    config.search.page_size = page_size;
  }
  config.validate()?;

  info!(endpoint = %config.endpoint, page_size = config.search.page_size, "config loaded");

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
