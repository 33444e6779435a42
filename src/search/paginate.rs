/// Pages shown in full before the page bar starts collapsing into ellipses
const MAX_VISIBLE_PAGES: usize = 5;

/// The items of 1-based `page`, clamped to what exists.
///
/// Paging past the end yields a shorter or empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
  debug_assert!(page >= 1, "pages are 1-based");
  debug_assert!(page_size >= 1, "page size must be positive");
  let page = page.max(1);
  let page_size = page_size.max(1);

  let start = (page - 1).saturating_mul(page_size).min(items.len());
  let end = page.saturating_mul(page_size).min(items.len());
  &items[start..end]
}

/// Number of pages needed for `len` items; zero when there are none
pub fn page_count(len: usize, page_size: usize) -> usize {
  debug_assert!(page_size >= 1, "page size must be positive");
  len.div_ceil(page_size.max(1))
}

/// Clamp `page` into `[1, max(1, total_pages)]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
  page.clamp(1, total_pages.max(1))
}

/// One slot of the numbered page bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
  Page(usize),
  Ellipsis,
}

/// Page numbers to show around `current`, with ellipses for skipped runs
pub fn page_window(current: usize, total: usize) -> Vec<PageItem> {
  if total <= MAX_VISIBLE_PAGES {
    return (1..=total).map(PageItem::Page).collect();
  }

  let mut items = vec![PageItem::Page(1)];

  if current > 3 {
    items.push(PageItem::Ellipsis);
  }

  let start = current.saturating_sub(1).max(2);
  let end = (current + 1).min(total - 1);
  items.extend((start..=end).map(PageItem::Page));

  if current + 2 < total {
    items.push(PageItem::Ellipsis);
  }

  items.push(PageItem::Page(total));
  items
}
