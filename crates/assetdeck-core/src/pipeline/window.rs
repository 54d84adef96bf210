use std::ops::Range;
use std::time::{Duration, Instant};

/// Rows per page for paged views.
pub const PAGE_SIZE: usize = 10;

/// Rows revealed before any "load more" trigger.
pub const REVEAL_INITIAL: usize = 10;

/// Rows added by each completed reveal.
pub const REVEAL_STEP: usize = 10;

/// Simulated latency of a reveal.
pub const REVEAL_DELAY: Duration = Duration::from_millis(300);

/// How a view exposes its filtered, sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Fixed-size pages with explicit navigation.
    Paged,
    /// A growing prefix extended by scrolling to the end.
    Reveal,
    /// Every filtered row at once.
    Unbounded,
}

/// Page cursor. The page is always kept inside `[1, total_pages]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages for `filtered` rows; zero rows still count as one page.
    pub fn total_pages(&self, filtered: usize) -> usize {
        filtered.div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, requested: usize, filtered: usize) {
        self.page = requested.clamp(1, self.total_pages(filtered));
    }

    pub fn next(&mut self, filtered: usize) {
        self.set_page(self.page + 1, filtered);
    }

    pub fn prev(&mut self, filtered: usize) {
        self.set_page(self.page.saturating_sub(1), filtered);
    }

    /// Pull the page back in range after the filtered count shrank.
    pub fn clamp(&mut self, filtered: usize) {
        self.set_page(self.page, filtered);
    }

    /// Row range of the current page.
    pub fn range(&self, filtered: usize) -> Range<usize> {
        let page = self.page.clamp(1, self.total_pages(filtered));
        let start = ((page - 1) * self.page_size).min(filtered);
        let end = (start + self.page_size).min(filtered);
        start..end
    }
}

/// Progressive reveal state.
///
/// The revealed count only grows. At most one reveal is in flight; triggers
/// arriving while one is pending are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    count: usize,
    in_flight_since: Option<Instant>,
}

impl Default for Reveal {
    fn default() -> Self {
        Self {
            count: REVEAL_INITIAL,
            in_flight_since: None,
        }
    }
}

impl Reveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently shown out of `filtered`.
    pub fn visible(&self, filtered: usize) -> usize {
        self.count.min(filtered)
    }

    pub fn has_more(&self, filtered: usize) -> bool {
        self.count < filtered
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight_since.is_some()
    }

    /// Start a reveal. Returns false when ignored.
    pub fn trigger(&mut self, filtered: usize, now: Instant) -> bool {
        if self.is_loading() || !self.has_more(filtered) {
            return false;
        }
        self.in_flight_since = Some(now);
        true
    }

    /// Complete an in-flight reveal once its delay has passed.
    /// Returns true if the reveal completed.
    ///
    /// The count is not capped here; `visible` and `has_more` clamp against
    /// whatever the filtered count is when they are read.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.in_flight_since {
            Some(at) if now.saturating_duration_since(at) >= REVEAL_DELAY => {
                self.in_flight_since = None;
                self.count += REVEAL_STEP;
                true
            }
            _ => false,
        }
    }
}

/// Window over the filtered list, selected by [`WindowPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Window {
    Unbounded,
    Paged(Pager),
    Reveal(Reveal),
}

impl Window {
    pub fn for_policy(policy: WindowPolicy) -> Self {
        match policy {
            WindowPolicy::Unbounded => Window::Unbounded,
            WindowPolicy::Paged => Window::Paged(Pager::new(PAGE_SIZE)),
            WindowPolicy::Reveal => Window::Reveal(Reveal::new()),
        }
    }

    pub fn range(&self, filtered: usize) -> Range<usize> {
        match self {
            Window::Unbounded => 0..filtered,
            Window::Paged(pager) => pager.range(filtered),
            Window::Reveal(reveal) => 0..reveal.visible(filtered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let pager = Pager::new(10);
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.total_pages(10), 1);
        assert_eq!(pager.total_pages(11), 2);
        assert_eq!(pager.total_pages(25), 3);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pager = Pager::new(10);
        pager.set_page(7, 25);
        assert_eq!(pager.page(), 3);
        pager.set_page(0, 25);
        assert_eq!(pager.page(), 1);
        pager.set_page(5, 0);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_next_prev_stop_at_bounds() {
        let mut pager = Pager::new(10);
        pager.prev(25);
        assert_eq!(pager.page(), 1);
        pager.next(25);
        pager.next(25);
        pager.next(25);
        assert_eq!(pager.page(), 3);
    }

    #[test]
    fn test_range_of_last_partial_page() {
        let mut pager = Pager::new(10);
        pager.set_page(3, 25);
        assert_eq!(pager.range(25), 20..25);
    }

    #[test]
    fn test_range_after_shrink_shows_last_page() {
        let mut pager = Pager::new(10);
        pager.set_page(3, 25);
        // filter reduced the list to 4 rows
        assert_eq!(pager.range(4), 0..4);
        pager.clamp(4);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_reveal_grows_after_delay() {
        let start = Instant::now();
        let mut reveal = Reveal::new();
        assert_eq!(reveal.visible(37), 10);
        assert!(reveal.trigger(37, start));
        assert!(!reveal.poll(start + Duration::from_millis(100)));
        assert_eq!(reveal.visible(37), 10);
        assert!(reveal.poll(start + REVEAL_DELAY));
        assert_eq!(reveal.visible(37), 20);
    }

    #[test]
    fn test_reveal_ignores_trigger_in_flight() {
        let start = Instant::now();
        let mut reveal = Reveal::new();
        assert!(reveal.trigger(37, start));
        assert!(!reveal.trigger(37, start + Duration::from_millis(50)));
        reveal.poll(start + Duration::from_millis(300));
        assert_eq!(reveal.visible(37), 20);
    }

    #[test]
    fn test_reveal_clamps_to_filtered() {
        let start = Instant::now();
        let mut reveal = Reveal::new();
        for step in 0..5u64 {
            let at = start + Duration::from_secs(step);
            reveal.trigger(37, at);
            reveal.poll(at + REVEAL_DELAY);
        }
        assert_eq!(reveal.visible(37), 37);
        assert!(!reveal.has_more(37));
        assert!(!reveal.trigger(37, start + Duration::from_secs(10)));
    }

    #[test]
    fn test_reveal_never_shrinks() {
        let start = Instant::now();
        let mut reveal = Reveal::new();
        reveal.trigger(37, start);
        reveal.poll(start + REVEAL_DELAY);
        assert_eq!(reveal.visible(37), 20);

        // filter narrowed to 5 rows, then widened again
        assert_eq!(reveal.visible(5), 5);
        assert_eq!(reveal.visible(37), 20);
    }

    #[test]
    fn test_reveal_step_ignores_filtered_count_at_trigger() {
        let start = Instant::now();
        let mut reveal = Reveal::new();
        assert!(reveal.trigger(12, start));
        assert!(reveal.poll(start + REVEAL_DELAY));

        // the list widened to 40 rows while the reveal was pending
        assert_eq!(reveal.visible(40), REVEAL_INITIAL + REVEAL_STEP);
        assert_eq!(reveal.visible(12), 12);
    }

    #[test]
    fn test_window_for_policy() {
        assert_eq!(Window::for_policy(WindowPolicy::Unbounded).range(42), 0..42);
        assert_eq!(Window::for_policy(WindowPolicy::Paged).range(42), 0..10);
        assert_eq!(Window::for_policy(WindowPolicy::Reveal).range(3), 0..3);
    }
}
