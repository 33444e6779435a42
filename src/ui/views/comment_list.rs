use crate::api::{ApiError, Comment, CommentsClient};
use crate::config::SearchConfig;
use crate::query::{Query, QueryState};
use crate::search::ResultPage;
use crate::timer::{Scheduler, TimerFired};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{draw_page_bar, ellipsize, highlight_spans};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::CommentDetailView;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tracing::{debug, info, warn};

const BODY_PREVIEW_CHARS: usize = 64;

/// Root view: search box, filtered comment list and page bar
pub struct CommentListView<S: Scheduler> {
  query: Query<Vec<Comment>, ApiError>,
  search: SearchInput<S>,
  list_state: ListState,
  /// Search had focus when the terminal lost it
  refocus_search: bool,
}

impl<S: Scheduler> CommentListView<S> {
  pub fn new(client: CommentsClient, config: &SearchConfig, scheduler: S) -> Self {
    let query = Query::new(move || {
      let client = client.clone();
      async move { client.fetch_all().await }
    });
    Self::with_query(query, config, scheduler)
  }

  /// Build around an existing query; fetching starts immediately
  pub fn with_query(
    mut query: Query<Vec<Comment>, ApiError>,
    config: &SearchConfig,
    scheduler: S,
  ) -> Self {
    query.fetch();

    Self {
      query,
      search: SearchInput::new(config, scheduler),
      list_state: ListState::default(),
      refocus_search: false,
    }
  }

  fn comments(&self) -> &[Comment] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  fn results(&self) -> ResultPage<'_> {
    self.search.session().results(self.comments())
  }

  fn go_to_page(&mut self, page: usize) {
    let total = self.results().total_matches;
    self.search.session_mut().change_page(page, total);
    self.list_state.select(Some(0));
  }

  fn on_search_event(&mut self, event: SearchEvent) {
    match event {
      SearchEvent::Submitted => {
        debug!(query = self.search.session().committed_query(), "search submitted");
        self.list_state.select(Some(0));
      }
    }
  }

  fn render_error(&self, frame: &mut Frame, area: Rect, error: &ApiError) {
    let block = Block::default()
      .title(" Comments ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));

    let lines = vec![
      Line::styled(
        error.display_message(),
        Style::default().fg(Color::Red).bold(),
      ),
      Line::raw(""),
      Line::styled(error.message(), Style::default().fg(Color::DarkGray)),
      Line::raw(""),
      Line::from(vec![
        Span::raw("Press '"),
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::raw("' to try again"),
      ]),
    ];

    let paragraph = Paragraph::new(lines)
      .block(block)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
  }

  fn render_message(&self, frame: &mut Frame, area: Rect, title: String, message: String) {
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(message)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, page_bar: Rect) {
    let session = self.search.session();
    let committed = session.committed_query().to_string();
    let results = session.results(self.comments());

    let title = if committed.is_empty() {
      format!(" Comments ({}) ", results.total_matches)
    } else {
      format!(" Comments [{}] ({}) ", committed, results.total_matches)
    };

    if results.comments.is_empty() {
      let message = if committed.is_empty() {
        "No results found".to_string()
      } else {
        format!("No results found for \"{}\"", committed)
      };
      self.render_message(frame, area, title, message);
      return;
    }

    let mark = Style::default().fg(Color::Black).bg(Color::Yellow);
    let items: Vec<ListItem> = results
      .comments
      .iter()
      .map(|c| {
        let preview = ellipsize(&c.body.replace('\n', " "), BODY_PREVIEW_CHARS);
        let body: Vec<Span<'static>> = highlight_spans(&preview, &committed, Style::default(), mark)
          .into_iter()
          .map(|span| Span::styled(span.content.into_owned(), span.style))
          .collect();

        ListItem::new(vec![
          Line::from(vec![
            Span::styled(format!("#{:<4}", c.id), Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(c.name.clone(), Style::default().fg(Color::Cyan).bold()),
          ]),
          Line::from(vec![
            Span::raw("      "),
            Span::styled(c.email.clone(), Style::default().fg(Color::Blue)),
          ]),
          Line::from([vec![Span::raw("      ")], body].concat()),
        ])
      })
      .collect();

    let (len, page, total_pages) = (results.comments.len(), results.page, results.total_pages);
    ensure_valid_selection(&mut self.list_state, len);

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
    draw_page_bar(frame, page_bar, page, total_pages);
  }
}

impl<S: Scheduler + 'static> View for CommentListView<S> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let search component try to handle first
    match self.search.handle_key(key) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(event) => {
        self.on_search_event(event);
        return ViewAction::None;
      }
      KeyResult::NotHandled => {}
    }

    let results = self.results();
    let (page, total_pages) = (results.page, results.total_pages);
    let selected = self
      .list_state
      .selected()
      .and_then(|idx| results.comments.get(idx).map(|c| (*c).clone()));

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('l') | KeyCode::Right if page < total_pages => self.go_to_page(page + 1),
      KeyCode::Char('h') | KeyCode::Left if page > 1 => self.go_to_page(page - 1),
      KeyCode::Char('g') | KeyCode::Home => self.go_to_page(1),
      KeyCode::Char('G') | KeyCode::End => self.go_to_page(total_pages),
      KeyCode::Char('r') => {
        info!("refetching comments");
        self.query.refetch();
      }
      KeyCode::Enter => {
        if let Some(comment) = selected {
          return ViewAction::Push(Box::new(CommentDetailView::new(comment)));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn handle_mouse(&mut self, mouse: MouseEvent) -> ViewAction {
    if let KeyResult::Event(event) = self.search.handle_mouse(mouse) {
      self.on_search_event(event);
    }
    ViewAction::None
  }

  fn focus_changed(&mut self, focused: bool) {
    if focused {
      if std::mem::take(&mut self.refocus_search) {
        self.search.activate();
      }
    } else if self.search.is_active() {
      self.refocus_search = true;
      self.search.session_mut().blur();
    }
  }

  fn timer_fired(&mut self, fired: TimerFired) {
    let comments = self.query.data().map(|v| v.as_slice()).unwrap_or(&[]);
    self.search.session_mut().on_timer(fired, comments);
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Search input
        Constraint::Min(1),    // Results
        Constraint::Length(1), // Page bar
      ])
      .split(area);

    match self.query.state() {
      QueryState::Idle | QueryState::Loading => self.render_message(
        frame,
        chunks[1],
        " Comments ".to_string(),
        "Loading comments...".to_string(),
      ),
      QueryState::Error(error) => self.render_error(frame, chunks[1], error),
      QueryState::Success(_) if self.search.session().is_submitting() => self.render_message(
        frame,
        chunks[1],
        " Comments ".to_string(),
        "Searching comments...".to_string(),
      ),
      QueryState::Success(_) => self.render_list(frame, chunks[1], chunks[2]),
    }

    // Suggestions overlay the results, so draw them last
    let is_fetching = self.query.is_loading();
    self.search.render(frame, chunks[0], chunks[1], is_fetching);
  }

  fn breadcrumb_label(&self) -> String {
    let committed = self.search.session().committed_query();
    if committed.is_empty() {
      "Comments".to_string()
    } else {
      format!("Comments [/{}]", committed)
    }
  }

  fn status(&self) -> Option<String> {
    match self.query.state() {
      QueryState::Idle | QueryState::Loading => Some("loading...".to_string()),
      QueryState::Error(e) => Some(e.display_message().to_string()),
      QueryState::Success(comments) => {
        let fetched = self
          .query
          .fetched_at()
          .map(|t| format!(" @ {}", t.format("%H:%M:%S")))
          .unwrap_or_default();
        Some(format!("{} comments{}", comments.len(), fetched))
      }
    }
  }

  fn tick(&mut self) {
    if self.query.poll() {
      if let Some(e) = self.query.error() {
        warn!(kind = ?e.kind(), error = %e, "comments unavailable");
      }
      // Data changed underneath the current page
      let results = self.results();
      let (page, total) = (results.page, results.total_matches);
      self.search.session_mut().change_page(page, total);
    }
  }

  fn shutdown(&mut self) {
    self.search.session_mut().shutdown();
    self.query.cancel();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("/", "search").with_priority(10),
      ShortcutInfo::new("h/l", "page").with_priority(20),
      ShortcutInfo::new("enter", "open").with_priority(25),
      ShortcutInfo::new("r", "reload").with_priority(30),
      ShortcutInfo::new("q", "quit").with_priority(40),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::search::testing::numbered_comments;
  use crate::search::Phase;
  use crate::timer::{ManualScheduler, TimerKind};
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
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

  async fn loaded_view(comments: Vec<Comment>) -> CommentListView<ManualScheduler> {
    let query = Query::new(move || {
      let comments = comments.clone();
      async move { Ok(comments) }
    });
    let mut view = CommentListView::with_query(query, &SearchConfig::default(), ManualScheduler::new());
    for _ in 0..50 {
      view.tick();
      if view.query.is_success() {
        break;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(view.query.is_success());
    view
  }

  fn draw(view: &mut CommentListView<ManualScheduler>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal.draw(|f| view.render(f, f.area())).unwrap();
    screen(&terminal)
  }

  fn submit(view: &mut CommentListView<ManualScheduler>, text: &str) {
    view.handle_key(key(KeyCode::Char('/')));
    for c in text.chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
    view.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_loading_message() {
    let query = Query::new(|| async {
      tokio::time::sleep(Duration::from_secs(60)).await;
      Ok::<_, ApiError>(Vec::new())
    });
    let mut view = CommentListView::with_query(query, &SearchConfig::default(), ManualScheduler::new());
    assert!(draw(&mut view).contains("Loading comments..."));
  }

  #[tokio::test]
  async fn test_error_message_and_retry() {
    let query = Query::new(|| async { Err::<Vec<Comment>, _>(ApiError::from_status(503)) });
    let mut view = CommentListView::with_query(query, &SearchConfig::default(), ManualScheduler::new());
    for _ in 0..50 {
      view.tick();
      if view.query.is_error() {
        break;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let text = draw(&mut view);
    assert!(text.contains("Server temporarily unavailable"));
    assert!(text.contains("to try again"));

    view.handle_key(key(KeyCode::Char('r')));
    assert!(view.query.is_loading());
  }

  #[tokio::test]
  async fn test_first_page_listed() {
    let mut view = loaded_view(numbered_comments("Comment body", 45)).await;
    let text = draw(&mut view);
    assert!(text.contains("Comments (45)"));
    assert!(text.contains("Comment body 1"));
    assert_eq!(view.results().total_pages, 3);
  }

  #[tokio::test]
  async fn test_submit_shows_searching_then_results() {
    let mut view = loaded_view(numbered_comments("Comment body", 45)).await;
    submit(&mut view, "body 1");

    assert_eq!(view.search.session().phase(), Phase::Submitting);
    assert!(draw(&mut view).contains("Searching comments..."));

    let fired = view
      .search
      .session()
      .scheduler()
      .last(TimerKind::SubmitDelay)
      .unwrap();
    view.timer_fired(fired);

    // "body 1", "body 10".."body 19"
    assert_eq!(view.results().total_matches, 11);
    assert!(draw(&mut view).contains("Comments [body 1] (11)"));
  }

  #[tokio::test]
  async fn test_no_results_message() {
    let mut view = loaded_view(numbered_comments("Comment body", 5)).await;
    submit(&mut view, "zzz");
    let fired = view
      .search
      .session()
      .scheduler()
      .last(TimerKind::SubmitDelay)
      .unwrap();
    view.timer_fired(fired);

    assert!(draw(&mut view).contains("No results found for \"zzz\""));
  }

  #[tokio::test]
  async fn test_paging_keys() {
    let mut view = loaded_view(numbered_comments("Comment body", 45)).await;

    view.handle_key(key(KeyCode::Char('l')));
    assert_eq!(view.results().page, 2);
    view.handle_key(key(KeyCode::Char('G')));
    assert_eq!(view.results().page, 3);
    view.handle_key(key(KeyCode::Char('l')));
    assert_eq!(view.results().page, 3);
    view.handle_key(key(KeyCode::Char('h')));
    assert_eq!(view.results().page, 2);
    view.handle_key(key(KeyCode::Char('g')));
    assert_eq!(view.results().page, 1);
  }

  #[tokio::test]
  async fn test_enter_opens_detail() {
    let mut view = loaded_view(numbered_comments("Comment body", 3)).await;
    draw(&mut view);
    view.handle_key(key(KeyCode::Char('j')));

    match view.handle_key(key(KeyCode::Enter)) {
      ViewAction::Push(detail) => assert_eq!(detail.breadcrumb_label(), "#2"),
      _ => panic!("expected detail view"),
    }
  }

  #[tokio::test]
  async fn test_typing_in_search_does_not_navigate() {
    let mut view = loaded_view(numbered_comments("Comment body", 45)).await;
    view.handle_key(key(KeyCode::Char('/')));
    view.handle_key(key(KeyCode::Char('l')));
    view.handle_key(key(KeyCode::Char('q')));

    assert_eq!(view.results().page, 1);
    assert_eq!(view.search.session().live_query(), "lq");
  }

  #[tokio::test]
  async fn test_focus_round_trip_restores_search() {
    let mut view = loaded_view(numbered_comments("Comment body", 3)).await;
    view.handle_key(key(KeyCode::Char('/')));

    view.focus_changed(false);
    assert!(!view.search.is_active());
    view.focus_changed(true);
    assert!(view.search.is_active());
  }
}
