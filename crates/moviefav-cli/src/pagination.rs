//! Client-side pagination over an in-memory list.
//!
//! Pages are 1-based. Edge navigation is disabled rather than clamped:
//! activating a disabled control is a no-op.

use std::ops::{Range, RangeInclusive};

/// Items shown per page.
pub const PAGE_SIZE: usize = 5;

/// A navigation request against a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    /// Go to page 1.
    First,
    /// Go to the previous page.
    Prev,
    /// Go to the next page.
    Next,
    /// Go to the last page.
    Last,
    /// Go to a numbered page.
    Jump(usize),
}

/// Enabled/disabled state of the navigation controls for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    /// Current page (1-based).
    pub current: usize,
    /// Total number of pages (0 for an empty list).
    pub total_pages: usize,
    /// First button enabled.
    pub first_enabled: bool,
    /// Prev button enabled.
    pub prev_enabled: bool,
    /// Next button enabled.
    pub next_enabled: bool,
    /// Last button enabled.
    pub last_enabled: bool,
}

impl PageControls {
    /// Numbered page buttons to render.
    #[must_use]
    pub const fn pages(&self) -> RangeInclusive<usize> {
        1..=self.total_pages
    }
}

/// Page state for one paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    /// Current page (1-based).
    current_page: usize,
    /// Items per page (never 0).
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Paginator {
    /// Creates a paginator on page 1. A zero `page_size` is treated as 1.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `len` items.
    #[must_use]
    pub const fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Index range of the current page within a list of `len` items.
    #[must_use]
    pub fn page_range(&self, len: usize) -> Range<usize> {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    /// Visible slice of `items` for the current page.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.page_range(items.len())).unwrap_or_default()
    }

    /// Control states for a list of `len` items.
    #[must_use]
    pub const fn controls(&self, len: usize) -> PageControls {
        let total_pages = self.total_pages(len);
        let at_start = self.current_page <= 1;
        let at_end = self.current_page >= total_pages;
        PageControls {
            current: self.current_page,
            total_pages,
            first_enabled: !at_start,
            prev_enabled: !at_start,
            next_enabled: !at_end,
            last_enabled: !at_end,
        }
    }

    /// Applies `nav` for a list of `len` items.
    ///
    /// Returns `true` if the current page changed.
    pub fn apply(&mut self, nav: PageNav, len: usize) -> bool {
        let controls = self.controls(len);
        let target = match nav {
            PageNav::First if controls.first_enabled => 1,
            PageNav::Prev if controls.prev_enabled => self.current_page.saturating_sub(1),
            PageNav::Next if controls.next_enabled => self.current_page.saturating_add(1),
            PageNav::Last if controls.last_enabled => controls.total_pages,
            PageNav::Jump(page) if controls.pages().contains(&page) => page,
            _ => return false,
        };
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    /// Returns to page 1.
    pub const fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Pulls the current page back into range after the list shrank to `len`.
    pub fn clamp_to(&mut self, len: usize) {
        let last = self.total_pages(len).max(1);
        if self.current_page > last {
            self.current_page = last;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_twelve_items_three_pages() {
        // Arrange
        let list = items(12);
        let mut pager = Paginator::default();

        // Act & Assert
        assert_eq!(pager.total_pages(list.len()), 3);
        assert_eq!(pager.slice(&list), &[0, 1, 2, 3, 4]);

        assert!(pager.apply(PageNav::Jump(3), list.len()));
        assert_eq!(pager.slice(&list), &[10, 11]);
    }

    #[test]
    fn test_slices_cover_list_exactly() {
        for len in 0..=23 {
            // Arrange
            let list = items(len);
            let mut pager = Paginator::default();
            let total = pager.total_pages(len);
            let mut seen = Vec::new();

            // Act
            for page in 1..=total {
                assert!(pager.apply(PageNav::Jump(page), len) || page == 1);
                let slice = pager.slice(&list);
                assert!(slice.len() <= PAGE_SIZE);
                seen.extend_from_slice(slice);
            }

            // Assert
            assert_eq!(seen, list, "len={len}");
        }
    }

    #[test]
    fn test_empty_list() {
        // Arrange
        let list: Vec<usize> = Vec::new();
        let pager = Paginator::default();

        // Act
        let controls = pager.controls(list.len());

        // Assert
        assert_eq!(controls.total_pages, 0);
        assert!(pager.slice(&list).is_empty());
        assert!(!controls.first_enabled);
        assert!(!controls.prev_enabled);
        assert!(!controls.next_enabled);
        assert!(!controls.last_enabled);
        assert_eq!(controls.pages().count(), 0);
    }

    #[test]
    fn test_first_page_controls() {
        // Arrange
        let pager = Paginator::default();

        // Act
        let controls = pager.controls(12);

        // Assert
        assert!(!controls.first_enabled);
        assert!(!controls.prev_enabled);
        assert!(controls.next_enabled);
        assert!(controls.last_enabled);
    }

    #[test]
    fn test_last_page_controls() {
        // Arrange
        let mut pager = Paginator::default();
        pager.apply(PageNav::Last, 12);

        // Act
        let controls = pager.controls(12);

        // Assert
        assert_eq!(controls.current, 3);
        assert!(controls.first_enabled);
        assert!(controls.prev_enabled);
        assert!(!controls.next_enabled);
        assert!(!controls.last_enabled);
    }

    #[test]
    fn test_single_page_all_disabled() {
        // Arrange
        let pager = Paginator::default();

        // Act
        let controls = pager.controls(3);

        // Assert
        assert_eq!(controls.total_pages, 1);
        assert!(!controls.first_enabled);
        assert!(!controls.next_enabled);
    }

    #[test]
    fn test_navigation_sequence() {
        // Arrange
        let mut pager = Paginator::default();
        let len = 12;

        // Act & Assert
        assert!(pager.apply(PageNav::Next, len));
        assert_eq!(pager.current_page(), 2);
        assert!(pager.apply(PageNav::Next, len));
        assert_eq!(pager.current_page(), 3);
        assert!(pager.apply(PageNav::Prev, len));
        assert_eq!(pager.current_page(), 2);
        assert!(pager.apply(PageNav::First, len));
        assert_eq!(pager.current_page(), 1);
        assert!(pager.apply(PageNav::Last, len));
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    fn test_disabled_controls_are_noops() {
        // Arrange
        let mut pager = Paginator::default();

        // Act & Assert
        assert!(!pager.apply(PageNav::Prev, 12));
        assert!(!pager.apply(PageNav::First, 12));
        assert_eq!(pager.current_page(), 1);

        pager.apply(PageNav::Last, 12);
        assert!(!pager.apply(PageNav::Next, 12));
        assert!(!pager.apply(PageNav::Last, 12));
        assert_eq!(pager.current_page(), 3);

        let mut empty = Paginator::default();
        assert!(!empty.apply(PageNav::Next, 0));
        assert!(!empty.apply(PageNav::Last, 0));
        assert_eq!(empty.current_page(), 1);
    }

    #[test]
    fn test_jump_out_of_range_is_noop() {
        // Arrange
        let mut pager = Paginator::default();

        // Act & Assert
        assert!(!pager.apply(PageNav::Jump(0), 12));
        assert!(!pager.apply(PageNav::Jump(4), 12));
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        // Arrange
        let mut pager = Paginator::default();
        pager.apply(PageNav::Last, 11);
        assert_eq!(pager.current_page(), 3);

        // Act
        pager.clamp_to(10);

        // Assert
        assert_eq!(pager.current_page(), 2);

        pager.clamp_to(0);
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_reset() {
        // Arrange
        let mut pager = Paginator::default();
        pager.apply(PageNav::Last, 30);

        // Act
        pager.reset();

        // Assert
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        // Arrange & Act
        let pager = Paginator::new(0);

        // Assert
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.total_pages(4), 4);
    }
}
