use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/comments";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Comments endpoint, fetched once at startup
  pub endpoint: String,
  /// Custom title for header (defaults to "cmts")
  pub title: Option<String>,
  pub search: SearchConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      endpoint: DEFAULT_ENDPOINT.to_string(),
      title: None,
      search: SearchConfig::default(),
    }
  }
}

/// Tunables for filtering, autocomplete and pagination
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
  pub page_size: usize,
  /// Minimum query length for both submit and autocomplete
  pub min_query_len: usize,
  pub max_suggestions: usize,
  pub debounce_ms: u64,
  /// How long the "searching" indicator stays up after a submit
  pub submit_delay_ms: u64,
  /// Grace period between losing focus and hiding suggestions
  pub blur_grace_ms: u64,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      page_size: 20,
      min_query_len: 3,
      max_suggestions: 5,
      debounce_ms: 300,
      submit_delay_ms: 500,
      blur_grace_ms: 150,
    }
  }
}

impl SearchConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  pub fn submit_delay(&self) -> Duration {
    Duration::from_millis(self.submit_delay_ms)
  }

  pub fn blur_grace(&self) -> Duration {
    Duration::from_millis(self.blur_grace_ms)
  }
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./cmts.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/cmts/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => {
        tracing::info!(path = %p.display(), "loading config");
        Self::load_from_path(&p)?
      }
      None => {
        tracing::info!("no config file found, using defaults");
        Self::default()
      }
    };

    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("cmts.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("cmts").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    // An empty file deserializes to unit, not to a struct
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Reject settings the engines cannot work with
  pub fn validate(&self) -> Result<()> {
    self.endpoint_url()?;

    if self.search.page_size == 0 {
      return Err(eyre!("search.page_size must be at least 1"));
    }
    if self.search.min_query_len == 0 {
      return Err(eyre!("search.min_query_len must be at least 1"));
    }
    if self.search.max_suggestions == 0 {
      return Err(eyre!("search.max_suggestions must be at least 1"));
    }
    Ok(())
  }

  /// Parse the endpoint, accepting only http(s) URLs
  pub fn endpoint_url(&self) -> Result<Url> {
    let url = Url::parse(&self.endpoint)
      .map_err(|e| eyre!("Invalid endpoint URL {}: {}", self.endpoint, e))?;

    match url.scheme() {
      "http" | "https" => Ok(url),
      other => Err(eyre!("Unsupported endpoint scheme: {}", other)),
    }
  }

  /// Title shown in the header
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("cmts")
  }
}
