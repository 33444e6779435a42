//! Async query abstraction for data fetching.
//!
//! A `Query<T, E>` owns a fetcher closure and the state of its latest run.
//! Fetches run on tokio tasks and report back through a channel that the UI
//! drains with `poll()` on every tick, so the event loop never blocks on I/O.
//!
//! # Example
//!
//! ```ignore
//! let client = comments_client.clone();
//! let mut query = Query::new(move || {
//!     let client = client.clone();
//!     async move { client.fetch_all().await }
//! });
//!
//! query.fetch();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use chrono::{DateTime, Local};
use futures::future::BoxFuture;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T, E> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(E),
}

impl<T, E> QueryState<T, E> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&E> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A factory function that creates futures for fetching data
type FetcherFn<T, E> = Box<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Async query for data fetching with state management.
///
/// There is no retry policy: a failed fetch stays failed until `refetch()`.
pub struct Query<T, E = String> {
  state: QueryState<T, E>,
  fetcher: FetcherFn<T, E>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, E>>>,
  in_flight: Option<AbortHandle>,
  fetched_at: Option<DateTime<Local>>,
}

impl<T: Send + 'static, E: Send + 'static> Query<T, E> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is called each time `fetch()` or `refetch()` starts a run.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
      in_flight: None,
      fetched_at: None,
    }
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T, E> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn is_success(&self) -> bool {
    self.state.is_success()
  }

  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  pub fn error(&self) -> Option<&E> {
    self.state.error()
  }

  /// When the current data arrived
  pub fn fetched_at(&self) -> Option<DateTime<Local>> {
    self.fetched_at
  }

  /// Start fetching data if not already loading.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Drop whatever is in flight and fetch from scratch.
  pub fn refetch(&mut self) {
    self.cancel();
    self.start_fetch();
  }

  /// Abort an in-flight fetch; its result will never be observed.
  pub fn cancel(&mut self) {
    if let Some(handle) = self.in_flight.take() {
      handle.abort();
    }
    self.receiver = None;
    if self.state.is_loading() {
      self.state = QueryState::Idle;
    }
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.fetched_at = Some(Local::now());
        self.finish();
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.finish();
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Task died without reporting (panic); allow a fresh fetch
        tracing::warn!("query task ended without a result");
        self.state = QueryState::Idle;
        self.finish();
        true
      }
    }
  }

  fn finish(&mut self) {
    self.receiver = None;
    self.in_flight = None;
  }

  fn start_fetch(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)();
    let task = tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
    self.in_flight = Some(task.abort_handle());
  }
}

impl<T, E> Drop for Query<T, E> {
  fn drop(&mut self) {
    if let Some(handle) = self.in_flight.take() {
      handle.abort();
    }
  }
}

impl<T: std::fmt::Debug, E: std::fmt::Debug> std::fmt::Debug for Query<T, E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("fetched_at", &self.fetched_at)
      .finish_non_exhaustive()
  }
}
