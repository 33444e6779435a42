use serde::Deserialize;
use thiserror::Error;

/// A single comment record as served by the comments endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
  pub id: u64,
  pub name: String,
  pub email: String,
  pub body: String,
}

/// Failure classes of a fetch, without the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
  Network,
  Server,
  Parse,
  Unknown,
}

/// Errors produced by the comments client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
  /// Transport failed before a usable response arrived
  #[error("Network error: {0}")]
  Network(String),
  /// Status >= 500
  #[error("Server error: {0}")]
  Server(String),
  /// Success status but the payload was not a list of comments
  #[error("Parse error: {0}")]
  Parse(String),
  /// Any other non-success status
  #[error("Unknown error: {0}")]
  Unknown(String),
}

impl ApiError {
  /// Classify a non-success HTTP status
  pub fn from_status(status: u16) -> Self {
    let message = format!("HTTP error! status: {}", status);
    if status >= 500 {
      ApiError::Server(message)
    } else {
      ApiError::Unknown(message)
    }
  }

  pub fn kind(&self) -> ApiErrorKind {
    match self {
      ApiError::Network(_) => ApiErrorKind::Network,
      ApiError::Server(_) => ApiErrorKind::Server,
      ApiError::Parse(_) => ApiErrorKind::Parse,
      ApiError::Unknown(_) => ApiErrorKind::Unknown,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      ApiError::Network(m) | ApiError::Server(m) | ApiError::Parse(m) | ApiError::Unknown(m) => m,
    }
  }

  /// Short message shown to the user in place of the comment list
  pub fn display_message(&self) -> &'static str {
    match self.kind() {
      ApiErrorKind::Network => "Connection issues",
      _ => "Server temporarily unavailable",
    }
  }
}
