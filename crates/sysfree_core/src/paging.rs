//! crates/sysfree_core/src/paging.rs
//!
//! Which page links a pager shows around the current page.

pub const DEFAULT_MAX_PAGES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total: u32,
    /// First page of the contiguous run of links.
    pub start: u32,
    /// Last page of the contiguous run of links.
    pub end: u32,
}

impl PageWindow {
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    /// A standalone link to page 1 precedes the run.
    pub fn show_first(&self) -> bool {
        self.start > 1
    }

    pub fn leading_ellipsis(&self) -> bool {
        self.start > 2
    }

    pub fn trailing_ellipsis(&self) -> bool {
        self.end + 1 < self.total
    }

    /// A standalone link to the last page follows the run.
    pub fn show_last(&self) -> bool {
        self.end < self.total
    }

    pub fn previous_disabled(&self) -> bool {
        self.current == 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current == self.total
    }
}

/// `None` when there is nothing to page through.
pub fn page_window(current: u32, total: u32, max_pages: u32) -> Option<PageWindow> {
    if total <= 1 {
        return None;
    }
    let max_pages = max_pages.max(1);
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(max_pages / 2).max(1);
    let end = (start + max_pages - 1).min(total);
    if end - start + 1 < max_pages {
        start = (end + 1).saturating_sub(max_pages).max(1);
    }

    Some(PageWindow {
        current,
        total,
        start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_has_no_window() {
        assert_eq!(page_window(1, 0, DEFAULT_MAX_PAGES), None);
        assert_eq!(page_window(1, 1, DEFAULT_MAX_PAGES), None);
    }

    #[test]
    fn window_centres_on_current_page() {
        let window = page_window(10, 20, DEFAULT_MAX_PAGES).unwrap();
        assert_eq!(window.pages().collect::<Vec<_>>(), vec![8, 9, 10, 11, 12]);
        assert!(window.show_first() && window.leading_ellipsis());
        assert!(window.show_last() && window.trailing_ellipsis());
    }

    #[test]
    fn window_shifts_back_near_the_end() {
        let window = page_window(19, 20, DEFAULT_MAX_PAGES).unwrap();
        assert_eq!((window.start, window.end), (16, 20));
        assert!(!window.show_last());
        assert!(!window.next_disabled());

        let last = page_window(20, 20, DEFAULT_MAX_PAGES).unwrap();
        assert!(last.next_disabled());
    }

    #[test]
    fn window_at_the_start() {
        let window = page_window(1, 3, DEFAULT_MAX_PAGES).unwrap();
        assert_eq!((window.start, window.end), (1, 3));
        assert!(window.previous_disabled());
        assert!(!window.show_first() && !window.show_last());

        let near = page_window(4, 10, DEFAULT_MAX_PAGES).unwrap();
        assert_eq!((near.start, near.end), (2, 6));
        assert!(near.show_first() && !near.leading_ellipsis());
        assert!(near.trailing_ellipsis());
    }
}
