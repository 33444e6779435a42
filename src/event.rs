use crate::timer::TimerFired;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal mouse event
  Mouse(MouseEvent),
  /// Terminal window gained focus
  FocusGained,
  /// Terminal window lost focus
  FocusLost,
  /// Periodic tick for UI refresh and query polling
  Tick,
  /// A scheduled timer elapsed
  Timer(TimerFired),
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    let reader_tx = tx.clone();

    // Terminal polling blocks, keep it off the async workers
    tokio::task::spawn_blocking(move || loop {
      let event = if event::poll(tick_rate).unwrap_or(false) {
        match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
          Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
          Ok(CrosstermEvent::FocusGained) => Event::FocusGained,
          Ok(CrosstermEvent::FocusLost) => Event::FocusLost,
          _ => continue,
        }
      } else {
        Event::Tick
      };

      if reader_tx.send(event).is_err() {
        break;
      }
    });

    Self { tx, rx }
  }

  /// Sender for async tasks and timers that report back into the loop
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
