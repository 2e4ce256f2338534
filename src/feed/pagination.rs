//! Chunked page links.
//!
//! Page numbers are shown five at a time with "previous chunk" and "next
//! chunk" links. Most providers never report a total, so the last page is
//! often only a lower bound.

use std::ops::RangeInclusive;

/// Highest page the dashboard will ever request.
pub const MAX_PAGES: u32 = 50;

pub const PAGES_PER_CHUNK: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub pages: RangeInclusive<u32>,
    /// Target of the "previous chunk" link.
    pub prev_chunk: Option<u32>,
    /// Target of the "next chunk" link.
    pub next_chunk: Option<u32>,
}

/// The last page that can be navigated to.
///
/// With a known total this is the real page count; otherwise it is the
/// current page, plus one if the provider said more results exist.
pub fn last_page(current: u32, has_more: bool, total: Option<u64>, per_page: u32) -> u32 {
    let last = match total {
        Some(total) if per_page > 0 => {
            let pages = total.div_ceil(u64::from(per_page));
            u32::try_from(pages).unwrap_or(u32::MAX)
        }
        _ if has_more => current.saturating_add(1),
        _ => current,
    };
    last.min(MAX_PAGES)
}

pub fn window(current: u32, last: u32) -> PageWindow {
    let current = current.max(1);
    let chunk = (current - 1) / PAGES_PER_CHUNK;
    let start = chunk * PAGES_PER_CHUNK + 1;
    let end = (start + PAGES_PER_CHUNK - 1).min(last);

    PageWindow {
        current,
        pages: start..=end,
        prev_chunk: (start > 1).then(|| start - 1),
        next_chunk: (end < last).then(|| end + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_from_total() {
        assert_eq!(last_page(1, true, Some(13), 6), 3);
        assert_eq!(last_page(1, true, Some(12), 6), 2);
        assert_eq!(last_page(1, false, Some(0), 6), 0);
    }

    #[test]
    fn test_last_page_capped() {
        assert_eq!(last_page(1, true, Some(1_000_000), 6), MAX_PAGES);
        assert_eq!(last_page(50, true, None, 6), MAX_PAGES);
    }

    #[test]
    fn test_last_page_without_total() {
        assert_eq!(last_page(4, true, None, 10), 5);
        assert_eq!(last_page(4, false, None, 10), 4);
    }

    #[test]
    fn test_first_chunk() {
        let w = window(3, 20);
        assert_eq!(w.pages, 1..=5);
        assert_eq!(w.prev_chunk, None);
        assert_eq!(w.next_chunk, Some(6));
    }

    #[test]
    fn test_middle_chunk() {
        let w = window(7, 20);
        assert_eq!(w.pages, 6..=10);
        assert_eq!(w.prev_chunk, Some(5));
        assert_eq!(w.next_chunk, Some(11));
    }

    #[test]
    fn test_last_partial_chunk() {
        let w = window(12, 13);
        assert_eq!(w.pages, 11..=13);
        assert_eq!(w.prev_chunk, Some(10));
        assert_eq!(w.next_chunk, None);
    }

    #[test]
    fn test_unknown_total_grows_one_page_at_a_time() {
        let w = window(5, last_page(5, true, None, 10));
        assert_eq!(w.pages, 1..=5);
        assert_eq!(w.next_chunk, Some(6));
    }
}
