// src/catalog/paginate.rs
// =============================================================================
// Splits the filtered list into fixed-size pages.
//
// PageState is a small Copy value: callers pass it in and get the effective
// state back, instead of keeping a global "current page" somewhere.
//
// Rules:
// - total pages = ceil(count / page size), but never less than 1
// - a requested page is clamped into [1, total pages] silently
// - next/previous past either end does nothing
// =============================================================================

use std::num::NonZeroUsize;

use serde::Serialize;

// 8 cards per page; NonZeroUsize makes a page size of 0 unrepresentable
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(size) => size,
    None => unreachable!(),
};

/// Which page the user is looking at (1-based) and how big pages are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    current: usize,
    page_size: NonZeroUsize,
}

/// One page worth of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Effective (clamped) page number
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl PageState {
    // Page 1 of whatever the list turns out to hold
    pub const fn new(page_size: NonZeroUsize) -> Self {
        PageState {
            current: 1,
            page_size,
        }
    }

    pub const fn current(&self) -> usize {
        self.current
    }

    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    // Requests page `page`; clamping happens against the real page count
    pub const fn go_to(self, page: usize) -> Self {
        PageState {
            current: page,
            ..self
        }
    }

    // Pulls the page into [1, total_pages]; 0 pages counts as 1
    pub fn clamped(self, total_pages: usize) -> Self {
        PageState {
            current: self.current.clamp(1, total_pages.max(1)),
            ..self
        }
    }

    // One page forward, staying put on the last page
    pub fn next(self, total_pages: usize) -> Self {
        // Clamp first: a stale page past the end should not move further
        let state = self.clamped(total_pages);
        if state.current < total_pages {
            state.go_to(state.current + 1)
        } else {
            state
        }
    }

    // One page back, staying put on page 1
    pub fn previous(self) -> Self {
        if self.current > 1 {
            self.go_to(self.current - 1)
        } else {
            self.go_to(1)
        }
    }

    pub const fn first(self) -> Self {
        self.go_to(1)
    }

    pub fn last(self, total_pages: usize) -> Self {
        self.go_to(total_pages.max(1))
    }
}

impl Default for PageState {
    fn default() -> Self {
        PageState::new(DEFAULT_PAGE_SIZE)
    }
}

// ceil(count / page_size), with an empty list still being "page 1 of 1"
pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

// Returns the page `state` points at, plus the clamped state
pub fn paginate<T>(items: &[T], state: PageState) -> (Page<'_, T>, PageState) {
    let total = total_pages(items.len(), state.page_size);
    let state = state.clamped(total);

    // Page N covers items [(N-1)*size, N*size), cut short on the last page
    let size = state.page_size.get();
    let start = (state.current - 1) * size;
    let end = (start + size).min(items.len());
    // Only an empty list can make start == len; get() keeps that panic-free
    let slice = items.get(start..end).unwrap_or(&[]);

    let page = Page {
        items: slice,
        number: state.current,
        total_pages: total,
        total_items: items.len(),
    };
    (page, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_ten_items_page_size_eight() {
        let items: Vec<u32> = (1..=10).collect();
        let state = PageState::new(size(8));

        let (page, state) = paginate(&items, state);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 8);

        let (page, _) = paginate(&items, state.next(page.total_pages));
        assert_eq!(page.number, 2);
        assert_eq!(page.items, &[9, 10]);

        let (page, state) = paginate(&items, state.go_to(3));
        assert_eq!(page.number, 2);
        assert_eq!(state.current(), 2);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_empty_list_is_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let (page, state) = paginate(&items, PageState::new(size(8)).go_to(4));

        assert_eq!(page.total_pages, 1);
        assert_eq!(page.number, 1);
        assert!(page.items.is_empty());
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let items: Vec<u32> = (1..=3).collect();
        let (page, _) = paginate(&items, PageState::new(size(2)).go_to(0));
        assert_eq!(page.number, 1);
        assert_eq!(page.items, &[1, 2]);
    }

    #[test]
    fn test_pages_concatenate_to_original() {
        for count in [0usize, 1, 7, 8, 9, 16, 23] {
            let items: Vec<usize> = (0..count).collect();
            let page_size = size(8);
            let pages = total_pages(count, page_size);

            let mut joined = Vec::new();
            for number in 1..=pages {
                let (page, _) = paginate(&items, PageState::new(page_size).go_to(number));
                joined.extend_from_slice(page.items);
            }

            assert_eq!(joined, items, "count {count}");
        }
    }

    #[test]
    fn test_transitions_stay_in_bounds() {
        let state = PageState::new(size(8));

        assert_eq!(state.previous().current(), 1);
        assert_eq!(state.next(1).current(), 1);
        assert_eq!(state.next(3).next(3).next(3).current(), 3);
        assert_eq!(state.last(3).current(), 3);
        assert_eq!(state.last(3).previous().current(), 2);
        assert_eq!(state.last(3).first().current(), 1);
        assert_eq!(state.last(0).current(), 1);
    }

    #[test]
    fn test_next_from_stale_page_clamps_first() {
        // e.g. was on page 5, then a filter left only 2 pages
        let state = PageState::new(size(8)).go_to(5);
        assert_eq!(state.next(2).current(), 2);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, size(8)), 1);
        assert_eq!(total_pages(8, size(8)), 1);
        assert_eq!(total_pages(9, size(8)), 2);
        assert_eq!(total_pages(5, size(1)), 5);
    }
}
