//! Page navigation driven by horizontal swipes.

/// Direction of a completed horizontal swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right to left; shows the next page
    Left,
    /// Finger moved left to right; shows the previous page
    Right,
}

/// Modulo page counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNavigator {
    page: usize,
    page_count: usize,
}

impl PageNavigator {
    /// Creates a navigator showing `page` out of `page_count`.
    ///
    /// Returns `None` when `page` is not a valid index.
    pub fn new(page: usize, page_count: usize) -> Option<Self> {
        (page < page_count).then_some(Self { page, page_count })
    }

    /// Currently displayed page.
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Number of pages.
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Applies one swipe and returns the new page index.
    pub fn swipe(&mut self, direction: SwipeDirection) -> usize {
        self.page = match direction {
            SwipeDirection::Left => (self.page + 1) % self.page_count,
            SwipeDirection::Right => (self.page + self.page_count - 1) % self.page_count,
        };
        self.page
    }
}
