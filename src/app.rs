use crate::api::CommentsClient;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::timer::TokioScheduler;
use crate::ui;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::CommentListView;
use color_eyre::Result;
use crossterm::event::{
  DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, KeyCode,
  KeyEvent, KeyModifiers,
};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Application configuration
  config: Config,

  endpoint: Url,

  events: EventHandler,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  /// Must be called inside the tokio runtime
  pub fn new(config: Config) -> Result<Self> {
    let client = CommentsClient::new(&config)?;
    let endpoint = client.endpoint().clone();
    let events = EventHandler::new(TICK_RATE);
    let scheduler = TokioScheduler::new(events.sender());

    let root = CommentListView::new(client, &config.search, scheduler);

    Ok(Self {
      view_stack: vec![Box::new(root)],
      config,
      endpoint,
      events,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout()
      .execute(EnterAlternateScreen)?
      .execute(EnableMouseCapture)?
      .execute(EnableFocusChange)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.main_loop(&mut terminal).await;

    for view in self.view_stack.iter_mut().rev() {
      view.shutdown();
    }

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout()
      .execute(DisableFocusChange)?
      .execute(DisableMouseCapture)?
      .execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    info!(endpoint = %self.endpoint, "starting");

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match self.events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Mouse(mouse) => {
        if let Some(view) = self.view_stack.last_mut() {
          let action = view.handle_mouse(mouse);
          self.apply(action);
        }
      }
      Event::FocusGained => self.focus_changed(true),
      Event::FocusLost => self.focus_changed(false),
      Event::Tick => {
        for view in &mut self.view_stack {
          view.tick();
        }
      }
      // Timers belong to whichever view scheduled them; the rest ignore the id
      Event::Timer(fired) => {
        for view in &mut self.view_stack {
          view.timer_fired(fired);
        }
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    if let Some(view) = self.view_stack.last_mut() {
      let action = view.handle_key(key);
      self.apply(action);
    }
  }

  fn focus_changed(&mut self, focused: bool) {
    for view in &mut self.view_stack {
      view.focus_changed(focused);
    }
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => {
        debug!(view = %view.breadcrumb_label(), "push view");
        self.view_stack.push(view);
      }
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          if let Some(mut view) = self.view_stack.pop() {
            view.shutdown();
          }
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  // Accessors for UI rendering

  pub fn title(&self) -> &str {
    self.config.title()
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}
