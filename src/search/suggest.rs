use crate::api::Comment;
use crate::config::SearchConfig;
use crate::search::matching::{find_ignore_case, normalize_whitespace};
use std::collections::HashSet;

/// Distance from the match start within which the next space still ends the candidate
const TRAILING_WORD_WINDOW: usize = 50;

/// An autocomplete candidate extracted from a comment body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
  pub text: String,
  /// The whitespace-normalized body the candidate was taken from
  pub full_comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestOptions {
  pub min_query_len: usize,
  pub max_suggestions: usize,
}

impl Default for SuggestOptions {
  fn default() -> Self {
    Self::from(&SearchConfig::default())
  }
}

impl From<&SearchConfig> for SuggestOptions {
  fn from(config: &SearchConfig) -> Self {
    Self {
      min_query_len: config.min_query_len,
      max_suggestions: config.max_suggestions,
    }
  }
}

/// Compute autocomplete suggestions for `query` over every comment.
///
/// Candidates are deduplicated on their exact text (first one wins), ordered
/// by length with ties kept in discovery order, and capped.
pub fn suggest(comments: &[Comment], query: &str, options: &SuggestOptions) -> Vec<Suggestion> {
  if query.chars().count() < options.min_query_len || comments.is_empty() {
    return Vec::new();
  }

  let mut seen = HashSet::new();
  let mut suggestions = Vec::new();

  for comment in comments {
    let text = normalize_whitespace(&comment.body);
    let Some(candidate) = extract_candidate(&text, query) else {
      continue;
    };

    if seen.insert(candidate.to_string()) {
      suggestions.push(Suggestion {
        text: candidate.to_string(),
        full_comment: text.clone(),
      });
    }
  }

  // sort_by_key is stable
  suggestions.sort_by_key(|s| s.text.chars().count());
  suggestions.truncate(options.max_suggestions);
  suggestions
}

/// Slice the candidate phrase around the first match of `query` in normalized `text`
fn extract_candidate<'a>(text: &'a str, query: &str) -> Option<&'a str> {
  let found = find_ignore_case(text, query)?;
  let start = found.start;
  let mut end = found.end;

  // Complete the partially typed word
  end += text[end..]
    .find(char::is_whitespace)
    .unwrap_or(text.len() - end);

  // The space search starts at the boundary itself
  if let Some(offset) = text[end..].find(' ') {
    let next_space = end + offset;
    if text[start..next_space].chars().count() < TRAILING_WORD_WINDOW {
      end = next_space;
    }
  }

  Some(text[start..end].trim())
}
