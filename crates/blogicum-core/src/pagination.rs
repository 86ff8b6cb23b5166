//! Page-number pagination over post listings.

use serde::Serialize;

/// Fixed size of every post listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Page requested by the client, before it is checked against the result size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(number: u64) -> Self {
        Self {
            number,
            per_page: POSTS_PER_PAGE,
        }
    }

    /// Lenient parsing of a `?page=` value: anything unparsable is page 1.
    pub fn parse(raw: Option<&str>) -> Self {
        let number = raw
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(1);
        Self::new(number)
    }

    /// Clamp the requested page into `1..=last` for `total` results.
    pub fn resolve(&self, total: u64) -> PageWindow {
        let per_page = self.per_page.max(1);
        let last = total.div_ceil(per_page).max(1);
        let number = self.number.clamp(1, last);
        PageWindow {
            number,
            offset: (number - 1) * per_page,
            limit: per_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Concrete slice to fetch from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub offset: u64,
    pub limit: u64,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: u64) -> Self {
        Self {
            items,
            number: window.number,
            per_page: window.limit,
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page.max(1)).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_results_make_two_pages() {
        let first = PageRequest::new(1).resolve(12);
        assert_eq!(first, PageWindow { number: 1, offset: 0, limit: 10 });

        let second = PageRequest::new(2).resolve(12);
        assert_eq!(second, PageWindow { number: 2, offset: 10, limit: 10 });

        let page = Page::new(vec![11, 12], second, 12);
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_out_of_range_pages_are_clamped() {
        assert_eq!(PageRequest::new(0).resolve(12).number, 1);
        assert_eq!(PageRequest::new(99).resolve(12).number, 2);
        assert_eq!(PageRequest::new(3).resolve(0).number, 1);
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(PageRequest::parse(Some("3")).number, 3);
        assert_eq!(PageRequest::parse(Some("abc")).number, 1);
        assert_eq!(PageRequest::parse(None).number, 1);
    }
}
