use crate::search::{page_window, PageItem};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Build the page bar: first/prev arrows, numbered window, next/last arrows
pub fn page_bar_line(current: usize, total: usize) -> Line<'static> {
  let active = Style::default().fg(Color::Black).bg(Color::Blue).bold();
  let idle = Style::default().fg(Color::White);
  let disabled = Style::default().fg(Color::DarkGray);

  let at_start = current <= 1;
  let at_end = current >= total;

  let mut spans = vec![
    Span::styled("«", if at_start { disabled } else { idle }),
    Span::raw(" "),
    Span::styled("‹", if at_start { disabled } else { idle }),
    Span::raw("  "),
  ];

  for item in page_window(current, total) {
    match item {
      PageItem::Page(n) => {
        let style = if n == current { active } else { idle };
        spans.push(Span::styled(format!(" {} ", n), style));
      }
      PageItem::Ellipsis => spans.push(Span::styled(" ... ", disabled)),
    }
  }

  spans.extend([
    Span::raw("  "),
    Span::styled("›", if at_end { disabled } else { idle }),
    Span::raw(" "),
    Span::styled("»", if at_end { disabled } else { idle }),
  ]);

  Line::from(spans)
}

/// Draw the page bar centered in `area`; nothing when there is a single page
pub fn draw_page_bar(frame: &mut Frame, area: Rect, current: usize, total: usize) {
  if total <= 1 {
    return;
  }
  let paragraph = Paragraph::new(page_bar_line(current, total)).alignment(Alignment::Center);
  frame.render_widget(paragraph, area);
}
