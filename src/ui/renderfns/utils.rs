use crate::search::matching::find_all_ignore_case;
use ratatui::prelude::*;

/// Keep the first `max_chars` chars, appending "..." if anything was cut
pub fn ellipsize(s: &str, max_chars: usize) -> String {
  match s.char_indices().nth(max_chars) {
    Some((cut, _)) => format!("{}...", &s[..cut]),
    None => s.to_string(),
  }
}

/// Split `text` into spans, styling every case-insensitive occurrence of `query`
pub fn highlight_spans<'a>(text: &'a str, query: &str, base: Style, mark: Style) -> Vec<Span<'a>> {
  if query.trim().is_empty() {
    return vec![Span::styled(text, base)];
  }

  let mut spans = Vec::new();
  let mut last = 0;
  for range in find_all_ignore_case(text, query) {
    if range.start > last {
      spans.push(Span::styled(&text[last..range.start], base));
    }
    spans.push(Span::styled(&text[range.clone()], mark));
    last = range.end;
  }
  if last < text.len() {
    spans.push(Span::styled(&text[last..], base));
  }
  spans
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ellipsize_short_string() {
    assert_eq!(ellipsize("hello", 10), "hello");
  }

  #[test]
  fn test_ellipsize_exact_length() {
    assert_eq!(ellipsize("hello", 5), "hello");
  }

  #[test]
  fn test_ellipsize_long_string() {
    assert_eq!(ellipsize("hello world", 5), "hello...");
  }

  #[test]
  fn test_ellipsize_multibyte() {
    assert_eq!(ellipsize("ééééé", 2), "éé...");
  }

  #[test]
  fn test_highlight_marks_matches() {
    let mark = Style::default().bg(Color::Yellow);
    let spans = highlight_spans("Foo bar foo", "foo", Style::default(), mark);

    let parts: Vec<(&str, bool)> = spans
      .iter()
      .map(|s| (s.content.as_ref(), s.style == mark))
      .collect();
    assert_eq!(
      parts,
      vec![("Foo", true), (" bar ", false), ("foo", true)]
    );
  }

  #[test]
  fn test_highlight_blank_query() {
    let spans = highlight_spans("text", "  ", Style::default(), Style::default().bold());
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].content, "text");
  }
}
