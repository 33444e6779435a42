use crate::api::Comment;
use crate::search::matching::contains_ignore_case;

/// Comments whose body contains `query`, case-insensitively, in input order.
///
/// An empty query matches everything.
pub fn filter_comments<'a>(comments: &'a [Comment], query: &str) -> Vec<&'a Comment> {
  if query.is_empty() {
    return comments.iter().collect();
  }

  comments
    .iter()
    .filter(|comment| contains_ignore_case(&comment.body, query))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::search::testing::numbered_comments;

  #[test]
  fn test_empty_query_is_identity() {
    let comments = numbered_comments("Comment body", 25);
    let filtered = filter_comments(&comments, "");
    assert_eq!(filtered.len(), 25);
    assert!(filtered.iter().zip(&comments).all(|(a, b)| *a == b));
  }

  #[test]
  fn test_substring_matches_in_order() {
    let comments = numbered_comments("Comment body", 25);
    let filtered = filter_comments(&comments, "Comment body 1");

    let ids: Vec<u64> = filtered.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
  }

  #[test]
  fn test_case_insensitive() {
    let comments = numbered_comments("Comment body", 3);
    assert_eq!(filter_comments(&comments, "COMMENT BODY 2").len(), 1);
  }

  #[test]
  fn test_matches_body_only() {
    let mut comments = numbered_comments("Comment body", 2);
    comments[0].name = "needle".to_string();
    assert!(filter_comments(&comments, "needle").is_empty());
  }

  #[test]
  fn test_every_match_contains_query() {
    let comments = numbered_comments("Lorem ipsum dolor", 30);
    let query = "sum dolor 2";
    for comment in filter_comments(&comments, query) {
      assert!(comment.body.to_lowercase().contains(&query.to_lowercase()));
    }
  }
}
