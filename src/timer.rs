//! Cancellable one-shot timers delivered through the app event channel.
//!
//! A scheduled timer comes back as [`Event::Timer`] once its delay elapses.
//! Cancelling the returned [`CancelToken`] aborts the sleeping task; owners
//! still compare the fired id against the token they hold, since a timer can
//! fire between the last poll and the cancel.

use crate::event::Event;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
  NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed)
}

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
  /// Trailing-edge autocomplete debounce
  Autocomplete,
  /// End of the "searching" indicator after a submit
  SubmitDelay,
  /// Hide suggestions after focus left the input
  BlurHide,
}

/// Delivered when a timer's delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
  pub id: u64,
  pub kind: TimerKind,
}

/// Handle to a scheduled timer; dropping it cancels the timer
#[derive(Debug)]
pub struct CancelToken {
  id: u64,
  kind: TimerKind,
  handle: Option<AbortHandle>,
}

impl CancelToken {
  pub fn id(&self) -> u64 {
    self.id
  }

  /// Whether `fired` was produced by this token
  pub fn matches(&self, fired: &TimerFired) -> bool {
    self.id == fired.id && self.kind == fired.kind
  }

  pub fn cancel(mut self) {
    self.abort();
  }

  fn abort(&mut self) {
    if let Some(handle) = self.handle.take() {
      handle.abort();
    }
  }
}

impl Drop for CancelToken {
  fn drop(&mut self) {
    self.abort();
  }
}

/// Something that can run a timer and report back when it fires
pub trait Scheduler {
  fn schedule(&mut self, delay: Duration, kind: TimerKind) -> CancelToken;
}

/// Scheduler backed by tokio tasks posting into the app event channel
#[derive(Debug, Clone)]
pub struct TokioScheduler {
  tx: mpsc::UnboundedSender<Event>,
}

impl TokioScheduler {
  pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
    Self { tx }
  }
}

impl Scheduler for TokioScheduler {
  fn schedule(&mut self, delay: Duration, kind: TimerKind) -> CancelToken {
    let id = next_id();
    let tx = self.tx.clone();

    let task = tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      // Receiver gone means the app is shutting down
      let _ = tx.send(Event::Timer(TimerFired { id, kind }));
    });

    CancelToken {
      id,
      kind,
      handle: Some(task.abort_handle()),
    }
  }
}

/// Scheduler that only records requests; tests fire timers by hand
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualScheduler {
  scheduled: Vec<(TimerFired, Duration)>,
}

#[cfg(test)]
impl ManualScheduler {
  pub fn new() -> Self {
    Self::default()
  }

  /// The most recent timer of `kind`, as it would be delivered
  pub fn last(&self, kind: TimerKind) -> Option<TimerFired> {
    self
      .scheduled
      .iter()
      .rev()
      .find(|(fired, _)| fired.kind == kind)
      .map(|(fired, _)| *fired)
  }

  pub fn delay_of(&self, fired: TimerFired) -> Option<Duration> {
    self
      .scheduled
      .iter()
      .find(|(f, _)| *f == fired)
      .map(|(_, delay)| *delay)
  }

  pub fn count(&self, kind: TimerKind) -> usize {
    self.scheduled.iter().filter(|(f, _)| f.kind == kind).count()
  }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
  fn schedule(&mut self, delay: Duration, kind: TimerKind) -> CancelToken {
    let id = next_id();
    self.scheduled.push((TimerFired { id, kind }, delay));
    CancelToken {
      id,
      kind,
      handle: None,
    }
  }
}
