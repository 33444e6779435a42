use crate::timer::TimerFired;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
}

/// Trait for view behavior
///
/// Views handle their own input modes and return actions for the App to
/// execute: App → View → Components.
///
/// Views that load data asynchronously should use Query<T, E> internally and
/// poll it in the tick() method.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  fn handle_mouse(&mut self, _mouse: MouseEvent) -> ViewAction {
    ViewAction::None
  }

  /// Terminal focus changed
  fn focus_changed(&mut self, _focused: bool) {}

  /// A timer scheduled by this view (or one below it) fired
  fn timer_fired(&mut self, _fired: TimerFired) {}

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Short status for the header, e.g. a result count
  fn status(&self) -> Option<String> {
    None
  }

  /// Called on each tick to allow views to poll async queries
  fn tick(&mut self) {}

  /// Cancel pending work before the view goes away
  fn shutdown(&mut self) {}

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "back").with_priority(30)]
  }
}
