//! Case-insensitive substring matching over UTF-8 text.
//!
//! Matching lowercases char by char so that the returned byte ranges always
//! refer to the original haystack, even when lowercasing would change the
//! byte length of the text.

use std::ops::Range;

fn chars_eq_ignore_case(a: char, b: char) -> bool {
  a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte length of the prefix of `haystack` that matches `needle`, if any
fn match_len_at(haystack: &str, needle: &str) -> Option<usize> {
  let mut hay = haystack.char_indices();
  for n in needle.chars() {
    let (_, h) = hay.next()?;
    if !chars_eq_ignore_case(h, n) {
      return None;
    }
  }
  Some(hay.next().map(|(i, _)| i).unwrap_or(haystack.len()))
}

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
  if needle.is_empty() {
    return Some(0..0);
  }

  haystack
    .char_indices()
    .find_map(|(start, _)| match_len_at(&haystack[start..], needle).map(|len| start..start + len))
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  find_ignore_case(haystack, needle).is_some()
}

/// Byte ranges of every non-overlapping case-insensitive occurrence of `needle`
pub fn find_all_ignore_case(haystack: &str, needle: &str) -> Vec<Range<usize>> {
  let mut ranges = Vec::new();
  if needle.is_empty() {
    return ranges;
  }

  let mut offset = 0;
  while let Some(found) = find_ignore_case(&haystack[offset..], needle) {
    let range = offset + found.start..offset + found.end;
    offset = range.end;
    ranges.push(range);
  }
  ranges
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_find_ignore_case() {
    assert_eq!(find_ignore_case("Hello World", "world"), Some(6..11));
    assert_eq!(find_ignore_case("Hello World", "WORLD"), Some(6..11));
    assert_eq!(find_ignore_case("Hello World", "xyz"), None);
    assert_eq!(find_ignore_case("abc", ""), Some(0..0));
  }

  #[test]
  fn test_find_returns_first_occurrence() {
    assert_eq!(find_ignore_case("abc ABC abc", "abc"), Some(0..3));
  }

  #[test]
  fn test_multibyte_ranges_refer_to_haystack() {
    let text = "Crème BRÛLÉE";
    let range = find_ignore_case(text, "brûlée").unwrap();
    assert_eq!(&text[range], "BRÛLÉE");
  }

  #[test]
  fn test_needle_longer_than_haystack() {
    assert_eq!(find_ignore_case("ab", "abc"), None);
  }

  #[test]
  fn test_find_all() {
    let ranges = find_all_ignore_case("aaa Aa", "aa");
    assert_eq!(ranges, vec![0..2, 4..6]);
  }

  #[test]
  fn test_normalize_whitespace() {
    assert_eq!(normalize_whitespace("  a \n\t b  c\n"), "a b c");
    assert_eq!(normalize_whitespace("\n\n"), "");
  }
}
