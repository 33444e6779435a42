//! Fixtures shared by the search tests

use crate::api::Comment;

pub fn comment(id: u64, body: &str) -> Comment {
  Comment {
    id,
    name: format!("Name {}", id),
    email: format!("user{}@example.com", id),
    body: body.to_string(),
  }
}

/// `count` comments with bodies "<prefix> 1" ..= "<prefix> <count>"
pub fn numbered_comments(prefix: &str, count: u64) -> Vec<Comment> {
  (1..=count)
    .map(|i| comment(i, &format!("{} {}", prefix, i)))
    .collect()
}
