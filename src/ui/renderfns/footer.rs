use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const QUIT_HINT: &str = "ctrl-c quit ";

/// Breadcrumb of the view stack on the left, quit hint on the right
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String]) {
  let bar = Style::default().bg(Color::Black);
  frame.render_widget(Paragraph::new("").style(bar), area);

  let [left, right] = Layout::horizontal([
    Constraint::Min(1),
    Constraint::Length(QUIT_HINT.len() as u16),
  ])
  .areas(area);

  frame.render_widget(Paragraph::new(breadcrumb_line(breadcrumb)).style(bar), left);
  frame.render_widget(
    Paragraph::new(QUIT_HINT)
      .alignment(Alignment::Right)
      .style(bar.fg(Color::DarkGray)),
    right,
  );
}

fn breadcrumb_line(parts: &[String]) -> Line<'_> {
  let last = parts.len().saturating_sub(1);
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in parts.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
    }
    let style = if i == last {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };
    spans.push(Span::styled(part.as_str(), style));
  }

  Line::from(spans)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_breadcrumb_marks_current_view() {
    let parts = vec!["Comments".to_string(), "#3".to_string()];
    let line = breadcrumb_line(&parts);

    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, " Comments › #3");
    assert_eq!(line.spans.last().map(|s| s.style.fg), Some(Some(Color::Cyan)));
  }
}
