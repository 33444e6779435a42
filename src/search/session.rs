//! Search interaction state machine.
//!
//! `SearchSession` owns everything the search box decides: the live query
//! (what is typed), the committed query (what filters the list), the current
//! page, the suggestion list with its highlight, and the timers that debounce
//! autocomplete, hold the "searching" indicator and delay hiding on blur.
//!
//! It knows nothing about terminals. The UI feeds it text changes and
//! [`Intent`]s, forwards fired timers, and renders what it exposes.

use crate::api::Comment;
use crate::config::SearchConfig;
use crate::search::filter::filter_comments;
use crate::search::paginate::{clamp_page, page_count, paginate};
use crate::search::suggest::{suggest, SuggestOptions, Suggestion};
use crate::timer::{CancelToken, Scheduler, TimerFired, TimerKind};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Where the interaction currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Idle,
  /// Live query is non-empty; suggestions pending or shown
  Typing,
  /// A search was just committed; results are held behind an indicator
  Submitting,
  ShowingResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
  #[error("Minimum length is {min} characters")]
  TooShort { min: usize },
}

/// Keys the session reacts to while the search input is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
  Down,
  Up,
  Enter,
  Tab,
  Escape,
}

/// What the input component should do after an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
  /// The session did not use the key
  Ignored,
  Handled,
  /// A suggestion was accepted; the input must now show this text
  ReplaceInput(String),
  /// Submit was refused; the input keeps its text
  Invalid(SubmitError),
}

/// One page of filtered results
#[derive(Debug, Clone)]
pub struct ResultPage<'a> {
  pub comments: Vec<&'a Comment>,
  pub page: usize,
  pub total_pages: usize,
  pub total_matches: usize,
}

#[derive(Debug, Clone, Copy)]
struct Timings {
  debounce: Duration,
  submit_delay: Duration,
  blur_grace: Duration,
}

pub struct SearchSession<S: Scheduler> {
  scheduler: S,
  options: SuggestOptions,
  page_size: usize,
  timings: Timings,

  phase: Phase,
  live_query: String,
  committed_query: String,
  current_page: usize,

  suggestions: Vec<Suggestion>,
  /// -1 means the raw input is active
  highlighted: isize,
  panel_open: bool,
  focused: bool,
  validation: Option<SubmitError>,

  debounce: Option<CancelToken>,
  submit_delay: Option<CancelToken>,
  blur_hide: Option<CancelToken>,
}

impl<S: Scheduler> SearchSession<S> {
  pub fn new(config: &SearchConfig, scheduler: S) -> Self {
    Self {
      scheduler,
      options: SuggestOptions::from(config),
      page_size: config.page_size,
      timings: Timings {
        debounce: config.debounce(),
        submit_delay: config.submit_delay(),
        blur_grace: config.blur_grace(),
      },
      phase: Phase::Idle,
      live_query: String::new(),
      committed_query: String::new(),
      current_page: 1,
      suggestions: Vec::new(),
      highlighted: -1,
      panel_open: false,
      focused: false,
      validation: None,
      debounce: None,
      submit_delay: None,
      blur_hide: None,
    }
  }

  // Accessors for rendering

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn live_query(&self) -> &str {
    &self.live_query
  }

  pub fn committed_query(&self) -> &str {
    &self.committed_query
  }

  pub fn current_page(&self) -> usize {
    self.current_page
  }

  pub fn min_query_len(&self) -> usize {
    self.options.min_query_len
  }

  pub fn suggestions(&self) -> &[Suggestion] {
    &self.suggestions
  }

  /// Highlighted suggestion, if any
  pub fn highlighted(&self) -> Option<usize> {
    usize::try_from(self.highlighted).ok()
  }

  /// The panel shows whenever it is open and has something to show
  pub fn panel_visible(&self) -> bool {
    self.panel_open && !self.suggestions.is_empty()
  }

  pub fn is_submitting(&self) -> bool {
    self.phase == Phase::Submitting
  }

  /// An autocomplete run is scheduled but has not fired yet
  pub fn is_suggesting(&self) -> bool {
    self.debounce.is_some()
  }

  pub fn is_focused(&self) -> bool {
    self.focused
  }

  pub fn validation_error(&self) -> Option<&SubmitError> {
    self.validation.as_ref()
  }

  #[cfg(test)]
  pub fn scheduler(&self) -> &S {
    &self.scheduler
  }

  // Transitions

  /// The input text changed (one keystroke or a paste)
  pub fn input_changed(&mut self, text: &str) {
    self.live_query = text.to_string();
    self.validation = None;
    // Suggestions on screen were computed for the previous text
    self.highlighted = -1;
    cancel(&mut self.debounce);

    if text.is_empty() {
      self.clear_suggestions();
      self.panel_open = false;
      if self.phase != Phase::Submitting {
        self.phase = Phase::Idle;
      }
      return;
    }

    if self.phase != Phase::Submitting {
      self.phase = Phase::Typing;
    }
    self.panel_open = true;

    if text.chars().count() >= self.options.min_query_len {
      self.debounce = Some(
        self
          .scheduler
          .schedule(self.timings.debounce, TimerKind::Autocomplete),
      );
    } else {
      self.clear_suggestions();
    }
  }

  /// Commit `text` as the search query.
  ///
  /// Empty text is accepted and clears the filter.
  pub fn submit(&mut self, text: &str) -> Result<(), SubmitError> {
    let len = text.chars().count();
    if len > 0 && len < self.options.min_query_len {
      let err = SubmitError::TooShort {
        min: self.options.min_query_len,
      };
      self.validation = Some(err.clone());
      return Err(err);
    }

    debug!(query = text, "search submitted");

    cancel(&mut self.debounce);
    self.clear_suggestions();
    self.panel_open = false;
    self.validation = None;

    self.live_query = text.to_string();
    self.committed_query = text.to_string();
    self.current_page = 1;
    self.phase = Phase::Submitting;

    cancel(&mut self.submit_delay);
    self.submit_delay = Some(
      self
        .scheduler
        .schedule(self.timings.submit_delay, TimerKind::SubmitDelay),
    );
    Ok(())
  }

  /// React to a navigation or confirmation key
  pub fn handle_intent(&mut self, intent: Intent) -> Reaction {
    let visible = self.panel_visible();

    match intent {
      Intent::Down if visible => {
        let last = self.suggestions.len() as isize - 1;
        self.highlighted = (self.highlighted + 1).min(last);
        Reaction::Handled
      }
      Intent::Up if visible => {
        self.highlighted = (self.highlighted - 1).max(-1);
        Reaction::Handled
      }
      Intent::Enter => match self.highlighted().filter(|_| visible) {
        Some(index) => self.select(index).map_or(Reaction::Handled, Reaction::ReplaceInput),
        None => {
          let text = self.live_query.clone();
          match self.submit(&text) {
            Ok(()) => Reaction::Handled,
            Err(e) => Reaction::Invalid(e),
          }
        }
      },
      Intent::Tab if visible => match self.highlighted() {
        Some(index) => match self.accept(index) {
          Some(text) => Reaction::ReplaceInput(text),
          None => Reaction::Ignored,
        },
        None => Reaction::Ignored,
      },
      Intent::Escape if visible => {
        self.panel_open = false;
        Reaction::Handled
      }
      _ => Reaction::Ignored,
    }
  }

  /// Accept suggestion `index` and submit it, as a click on the panel does.
  ///
  /// Returns the new input text.
  pub fn select(&mut self, index: usize) -> Option<String> {
    let text = self.accept(index)?;
    // Accepted text always starts with a query of valid length
    let submitted = self.submit(&text);
    debug_assert!(submitted.is_ok(), "accepted suggestion rejected: {:?}", submitted);
    Some(text)
  }

  /// Complete the live query with suggestion `index` without submitting
  fn accept(&mut self, index: usize) -> Option<String> {
    let suggestion = self.suggestions.get(index)?;
    let typed = self.live_query.chars().count();
    let remainder: String = suggestion.text.chars().skip(typed).collect();
    let text = format!("{}{}", self.live_query, remainder);

    self.live_query = text.clone();
    self.panel_open = false;
    self.highlighted = -1;
    Some(text)
  }

  /// The input lost focus; hide suggestions after the grace period
  pub fn blur(&mut self) {
    self.focused = false;
    cancel(&mut self.blur_hide);
    self.blur_hide = Some(
      self
        .scheduler
        .schedule(self.timings.blur_grace, TimerKind::BlurHide),
    );
  }

  pub fn focus(&mut self) {
    self.focused = true;
    cancel(&mut self.blur_hide);
    if self.live_query.chars().count() >= self.options.min_query_len {
      self.panel_open = true;
    }
  }

  /// Move to `page`, clamped to the pages that exist for `total_matches`
  pub fn change_page(&mut self, page: usize, total_matches: usize) {
    let total_pages = page_count(total_matches, self.page_size);
    self.current_page = clamp_page(page, total_pages);
  }

  /// Apply a fired timer. Returns whether state changed.
  pub fn on_timer(&mut self, fired: TimerFired, comments: &[Comment]) -> bool {
    match fired.kind {
      TimerKind::Autocomplete => {
        if !take_if_current(&mut self.debounce, &fired) {
          return false;
        }
        self.suggestions = suggest(comments, &self.live_query, &self.options);
        self.highlighted = -1;
        self.panel_open = !self.suggestions.is_empty();
        debug!(
          query = %self.live_query,
          count = self.suggestions.len(),
          "suggestions updated"
        );
        true
      }
      TimerKind::SubmitDelay => {
        if !take_if_current(&mut self.submit_delay, &fired) {
          return false;
        }
        if self.phase == Phase::Submitting {
          self.phase = Phase::ShowingResults;
        }
        true
      }
      TimerKind::BlurHide => {
        if !take_if_current(&mut self.blur_hide, &fired) {
          return false;
        }
        self.panel_open = false;
        true
      }
    }
  }

  /// Filter by the committed query and cut out the current page
  pub fn results<'a>(&self, comments: &'a [Comment]) -> ResultPage<'a> {
    let matches = filter_comments(comments, &self.committed_query);
    let total_pages = page_count(matches.len(), self.page_size);
    let page = clamp_page(self.current_page, total_pages);

    ResultPage {
      comments: paginate(&matches, self.page_size, page).to_vec(),
      page,
      total_pages,
      total_matches: matches.len(),
    }
  }

  /// Cancel every pending timer
  pub fn shutdown(&mut self) {
    cancel(&mut self.debounce);
    cancel(&mut self.submit_delay);
    cancel(&mut self.blur_hide);
  }

  fn clear_suggestions(&mut self) {
    self.suggestions.clear();
    self.highlighted = -1;
  }
}

fn cancel(slot: &mut Option<CancelToken>) {
  if let Some(token) = slot.take() {
    token.cancel();
  }
}

/// Clear `slot` if it holds the token that produced `fired`
fn take_if_current(slot: &mut Option<CancelToken>, fired: &TimerFired) -> bool {
  match slot {
    Some(token) if token.matches(fired) => {
      *slot = None;
      true
    }
    _ => false,
  }
}
