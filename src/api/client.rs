use crate::api::types::{ApiError, Comment};
use crate::config::Config;
use color_eyre::{eyre::eyre, Result};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client for the comments endpoint
#[derive(Clone)]
pub struct CommentsClient {
  http: reqwest::Client,
  endpoint: Url,
}

impl CommentsClient {
  pub fn new(config: &Config) -> Result<Self> {
    Self::with_endpoint(config.endpoint_url()?)
  }

  pub fn with_endpoint(endpoint: Url) -> Result<Self> {
    let http = reqwest::Client::builder()
      .connect_timeout(Duration::from_secs(10))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, endpoint })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  /// Fetch the whole comment collection in a single round-trip.
  ///
  /// Every failure is mapped to an [`ApiError`]; nothing is retried here.
  pub async fn fetch_all(&self) -> std::result::Result<Vec<Comment>, ApiError> {
    debug!(endpoint = %self.endpoint, "fetching comments");

    let response = self
      .http
      .get(self.endpoint.clone())
      .send()
      .await
      .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      warn!(status = status.as_u16(), "comments request failed");
      return Err(ApiError::from_status(status.as_u16()));
    }

    let body = response
      .text()
      .await
      .map_err(|e| ApiError::Network(e.to_string()))?;

    let comments: Vec<Comment> =
      serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;

    info!(count = comments.len(), "comments loaded");
    Ok(comments)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::ApiErrorKind;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;

  /// Serve the same canned response to every connection, counting requests
  async fn serve(status: &'static str, body: &'static str) -> (Url, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
      loop {
        let Ok((mut socket, _)) = listener.accept().await else {
          break;
        };
        counter.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
          let mut buf = Vec::new();
          let mut chunk = [0u8; 1024];
          while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut chunk).await {
              Ok(0) | Err(_) => return,
              Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
          }
          let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
          );
          let _ = socket.write_all(response.as_bytes()).await;
          let _ = socket.shutdown().await;
        });
      }
    });

    let url = Url::parse(&format!("http://{}/comments", addr)).unwrap();
    (url, hits)
  }

  #[tokio::test]
  async fn test_fetch_success() {
    let (url, _) = serve(
      "200 OK",
      r#"[{"postId":1,"id":1,"name":"alpha","email":"a@x.io","body":"first body"},
          {"postId":1,"id":2,"name":"beta","email":"b@x.io","body":"second body"}]"#,
    )
    .await;
    let client = CommentsClient::with_endpoint(url).unwrap();

    let comments = client.fetch_all().await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].name, "beta");
  }

  #[tokio::test]
  async fn test_server_error_is_classified() {
    let (url, _) = serve("500 Internal Server Error", "oops").await;
    let client = CommentsClient::with_endpoint(url).unwrap();

    let err = client.fetch_all().await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Server);
    assert_eq!(err.display_message(), "Server temporarily unavailable");
  }

  #[tokio::test]
  async fn test_client_error_is_unknown() {
    let (url, _) = serve("404 Not Found", "{}").await;
    let client = CommentsClient::with_endpoint(url).unwrap();

    let err = client.fetch_all().await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Unknown);
    assert_eq!(err.message(), "HTTP error! status: 404");
  }

  #[tokio::test]
  async fn test_malformed_payload_is_parse_error() {
    let (url, _) = serve("200 OK", r#"{"not": "a list"}"#).await;
    let client = CommentsClient::with_endpoint(url).unwrap();

    let err = client.fetch_all().await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Parse);
  }

  #[tokio::test]
  async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{}/comments", addr)).unwrap();
    let client = CommentsClient::with_endpoint(url).unwrap();

    let err = client.fetch_all().await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.display_message(), "Connection issues");
  }

  #[tokio::test]
  async fn test_retry_issues_a_new_request() {
    let (url, hits) = serve("503 Service Unavailable", "").await;
    let client = CommentsClient::with_endpoint(url).unwrap();

    assert!(client.fetch_all().await.is_err());
    assert!(client.fetch_all().await.is_err());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
  }
}
