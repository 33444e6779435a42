pub mod client;
pub mod types;

pub use client::CommentsClient;
pub use types::{ApiError, ApiErrorKind, Comment};
