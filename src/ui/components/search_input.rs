use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::config::SearchConfig;
use crate::search::{Intent, Reaction, SearchSession};
use crate::timer::Scheduler;
use crate::ui::renderfns::ellipsize;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// A new query was committed
  Submitted,
}

/// Search box with autocomplete panel.
///
/// Owns the text buffer and the [`SearchSession`]; translates terminal input
/// into session transitions and draws what the session exposes.
pub struct SearchInput<S: Scheduler> {
  input: TextInput,
  session: SearchSession<S>,
  input_area: Rect,
  panel_area: Option<Rect>,
}

impl<S: Scheduler> SearchInput<S> {
  pub fn new(config: &SearchConfig, scheduler: S) -> Self {
    Self {
      input: TextInput::new(),
      session: SearchSession::new(config, scheduler),
      input_area: Rect::default(),
      panel_area: None,
    }
  }

  pub fn session(&self) -> &SearchSession<S> {
    &self.session
  }

  pub fn session_mut(&mut self) -> &mut SearchSession<S> {
    &mut self.session
  }

  /// Whether the input has focus
  pub fn is_active(&self) -> bool {
    self.session.is_focused()
  }

  pub fn activate(&mut self) {
    self.session.focus();
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.is_active() {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    let intent = match key.code {
      KeyCode::Down => Some(Intent::Down),
      KeyCode::Up => Some(Intent::Up),
      KeyCode::Enter => Some(Intent::Enter),
      KeyCode::Tab => Some(Intent::Tab),
      KeyCode::Esc => Some(Intent::Escape),
      _ => None,
    };
    if let Some(intent) = intent {
      return self.apply_intent(intent);
    }

    match self.input.handle_key(key) {
      InputResult::Changed => {
        self.session.input_changed(self.input.value());
        KeyResult::Handled
      }
      InputResult::Consumed => KeyResult::Handled,
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  fn apply_intent(&mut self, intent: Intent) -> KeyResult<SearchEvent> {
    match self.session.handle_intent(intent) {
      Reaction::ReplaceInput(text) => {
        self.input.set_value(&text);
        if intent == Intent::Enter {
          KeyResult::Event(SearchEvent::Submitted)
        } else {
          KeyResult::Handled
        }
      }
      Reaction::Handled if intent == Intent::Enter => KeyResult::Event(SearchEvent::Submitted),
      Reaction::Handled | Reaction::Invalid(_) => KeyResult::Handled,
      Reaction::Ignored => {
        // Escape or Tab with nothing to act on moves focus out of the input
        if matches!(intent, Intent::Escape | Intent::Tab) {
          self.session.blur();
        }
        KeyResult::Handled
      }
    }
  }

  /// Handle a mouse event against the areas drawn by the last render
  pub fn handle_mouse(&mut self, mouse: MouseEvent) -> KeyResult<SearchEvent> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
      return KeyResult::NotHandled;
    }
    let pos = Position::new(mouse.column, mouse.row);

    if let Some(panel) = self.panel_area {
      if panel.contains(pos) {
        // First row is the border
        let Some(index) = mouse.row.checked_sub(panel.y + 1) else {
          return KeyResult::Handled;
        };
        if let Some(text) = self.session.select(index as usize) {
          self.input.set_value(&text);
          self.session.focus();
          return KeyResult::Event(SearchEvent::Submitted);
        }
        return KeyResult::Handled;
      }
    }

    if self.input_area.contains(pos) {
      self.activate();
      return KeyResult::Handled;
    }

    if self.is_active() {
      self.session.blur();
    }
    KeyResult::NotHandled
  }

  /// Draw the input into `input_area` and the suggestion panel over `overlay_area`
  pub fn render(&mut self, frame: &mut Frame, input_area: Rect, overlay_area: Rect, is_fetching: bool) {
    self.input_area = input_area;
    self.render_input(frame, input_area);

    self.panel_area = None;
    if is_fetching {
      return;
    }
    if self.session.panel_visible() {
      self.render_panel(frame, overlay_area);
    } else if self.session.is_suggesting() && self.is_active() {
      self.render_pending(frame, overlay_area);
    }
  }

  fn render_input(&self, frame: &mut Frame, area: Rect) {
    let border = if self.is_active() {
      Color::Yellow
    } else {
      Color::DarkGray
    };

    let mut block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(" Search ");

    if let Some(err) = self.session.validation_error() {
      block = block.title_bottom(Line::styled(
        format!(" {} ", err),
        Style::default().fg(Color::Red),
      ));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
      return;
    }

    let content = if self.input.is_empty() && !self.is_active() {
      Line::styled(
        format!(
          "Search comments... (min {} characters)",
          self.session.min_query_len()
        ),
        Style::default().fg(Color::DarkGray),
      )
    } else {
      Line::raw(self.input.value())
    };
    frame.render_widget(Paragraph::new(content), inner);

    if self.is_active() {
      let offset = self.input.cursor_position() as u16;
      frame.set_cursor_position(Position::new(
        (inner.x + offset).min(inner.right().saturating_sub(1)),
        inner.y,
      ));
    }
  }

  fn render_panel(&mut self, frame: &mut Frame, area: Rect) {
    let suggestions = self.session.suggestions();
    let height = (suggestions.len() as u16 + 2).min(area.height);
    if height < 3 {
      return;
    }
    let panel = Rect::new(area.x, area.y, area.width, height);

    let typed = self.session.live_query();
    let typed_len = typed.chars().count();
    let snippet_width = (area.width as usize).saturating_sub(typed_len + 24).max(8);

    let items: Vec<ListItem> = suggestions
      .iter()
      .map(|s| {
        let remainder: String = s.text.chars().skip(typed_len).collect();
        ListItem::new(Line::from(vec![
          Span::styled(typed.to_string(), Style::default().bold()),
          Span::raw(remainder),
          Span::raw("  "),
          Span::styled(
            ellipsize(&s.full_comment, snippet_width),
            Style::default().fg(Color::DarkGray),
          ),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(
        Block::default()
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Yellow)),
      )
      .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(self.session.highlighted());

    frame.render_widget(Clear, panel);
    frame.render_stateful_widget(list, panel, &mut state);
    self.panel_area = Some(panel);
  }

  fn render_pending(&self, frame: &mut Frame, area: Rect) {
    if area.height < 3 {
      return;
    }
    let panel = Rect::new(area.x, area.y, area.width, 3);
    let paragraph = Paragraph::new("Searching suggestions...")
      .style(Style::default().fg(Color::DarkGray))
      .block(
        Block::default()
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::DarkGray)),
      );

    frame.render_widget(Clear, panel);
    frame.render_widget(paragraph, panel);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::Comment;
  use crate::search::testing::comment;
  use crate::timer::{ManualScheduler, TimerKind};
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn search() -> SearchInput<ManualScheduler> {
    SearchInput::new(&SearchConfig::default(), ManualScheduler::new())
  }

  fn type_text(search: &mut SearchInput<ManualScheduler>, text: &str) {
    for c in text.chars() {
      search.handle_key(key(KeyCode::Char(c)));
    }
  }

  fn comments() -> Vec<Comment> {
    vec![
      comment(1, "quick brown fox"),
      comment(2, "quickly done"),
      comment(3, "quicksand everywhere"),
    ]
  }

  fn load_suggestions(search: &mut SearchInput<ManualScheduler>, comments: &[Comment]) {
    let fired = search
      .session()
      .scheduler()
      .last(TimerKind::Autocomplete)
      .unwrap();
    search.session_mut().on_timer(fired, comments);
  }

  fn screen(terminal: &Terminal<TestBackend>) -> String {
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[test]
  fn test_inactive_ignores_typing() {
    let mut search = search();
    assert_eq!(search.handle_key(key(KeyCode::Char('a'))), KeyResult::NotHandled);
    assert_eq!(search.handle_key(key(KeyCode::Char('/'))), KeyResult::Handled);
    assert!(search.is_active());
  }

  #[test]
  fn test_typing_updates_live_query() {
    let mut search = search();
    search.activate();
    type_text(&mut search, "qui");
    assert_eq!(search.session().live_query(), "qui");
    assert!(search.session().is_suggesting());

    search.handle_key(key(KeyCode::Backspace));
    assert_eq!(search.session().live_query(), "qu");
    assert!(!search.session().is_suggesting());
  }

  #[test]
  fn test_enter_submits() {
    let mut search = search();
    search.activate();
    type_text(&mut search, "fox");
    assert_eq!(
      search.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(SearchEvent::Submitted)
    );
    assert_eq!(search.session().committed_query(), "fox");
  }

  #[test]
  fn test_invalid_enter_stays_handled() {
    let mut search = search();
    search.activate();
    type_text(&mut search, "fo");
    assert_eq!(search.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert!(search.session().validation_error().is_some());
  }

  #[test]
  fn test_tab_fills_input() {
    let comments = comments();
    let mut search = search();
    search.activate();
    type_text(&mut search, "qui");
    load_suggestions(&mut search, &comments);

    search.handle_key(key(KeyCode::Down));
    search.handle_key(key(KeyCode::Down));
    search.handle_key(key(KeyCode::Down));
    assert_eq!(search.handle_key(key(KeyCode::Tab)), KeyResult::Handled);
    assert_eq!(search.input.value(), "quicksand");
    assert_eq!(search.session().committed_query(), "");
  }

  #[test]
  fn test_escape_hides_then_leaves() {
    let comments = comments();
    let mut search = search();
    search.activate();
    type_text(&mut search, "qui");
    load_suggestions(&mut search, &comments);

    search.handle_key(key(KeyCode::Esc));
    assert!(!search.session().panel_visible());
    assert!(search.is_active());

    search.handle_key(key(KeyCode::Esc));
    assert!(!search.is_active());
  }

  #[test]
  fn test_placeholder_rendered() {
    let mut search = search();
    let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
    terminal
      .draw(|f| search.render(f, Rect::new(0, 0, 60, 3), Rect::new(0, 3, 60, 7), false))
      .unwrap();

    assert!(screen(&terminal).contains("Search comments... (min 3 characters)"));
  }

  #[test]
  fn test_click_on_suggestion_submits() {
    let comments = comments();
    let mut search = search();
    search.activate();
    type_text(&mut search, "qui");
    load_suggestions(&mut search, &comments);

    let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
    terminal
      .draw(|f| search.render(f, Rect::new(0, 0, 60, 3), Rect::new(0, 3, 60, 7), false))
      .unwrap();
    assert!(screen(&terminal).contains("quicksand"));

    // Panel border at row 3, second suggestion at row 5
    let click = MouseEvent {
      kind: MouseEventKind::Down(MouseButton::Left),
      column: 4,
      row: 5,
      modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
      search.handle_mouse(click),
      KeyResult::Event(SearchEvent::Submitted)
    );
    assert_eq!(search.session().committed_query(), "quickly");
    assert_eq!(search.input.value(), "quickly");
  }

  #[test]
  fn test_panel_hidden_while_fetching() {
    let comments = comments();
    let mut search = search();
    search.activate();
    type_text(&mut search, "qui");
    load_suggestions(&mut search, &comments);

    let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
    terminal
      .draw(|f| search.render(f, Rect::new(0, 0, 60, 3), Rect::new(0, 3, 60, 7), true))
      .unwrap();
    assert!(!screen(&terminal).contains("quicksand"));
    assert!(search.panel_area.is_none());
  }
}
