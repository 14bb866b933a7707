//! Page slicing with forgiving page tokens.
//!
//! The requested page arrives as raw query text. It is never rejected:
//! - absent or not an integer: first page
//! - an integer outside `1..=num_pages`: last page
//! - otherwise: that page

use std::num::IntErrorKind;

/// One page of a sequence plus the metadata needed to render navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: usize,
    pub num_pages: usize,
    /// Total number of items across all pages.
    pub count: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageToken {
    Missing,
    Number(i64),
    OutOfRange,
}

fn parse_token(token: Option<&str>) -> PageToken {
    let Some(raw) = token else {
        return PageToken::Missing;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) => PageToken::Number(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => PageToken::OutOfRange,
            _ => PageToken::Missing,
        },
    }
}

/// Number of pages needed for `count` items. An empty sequence still has one
/// (empty) page.
pub fn page_count(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1)).max(1)
}

/// Resolve a raw page token to a page number in `1..=num_pages`.
pub fn resolve_page(token: Option<&str>, num_pages: usize) -> usize {
    match parse_token(token) {
        PageToken::Missing => 1,
        PageToken::OutOfRange => num_pages,
        PageToken::Number(n) if n < 1 || n as u64 > num_pages as u64 => num_pages,
        PageToken::Number(n) => n as usize,
    }
}

/// Slice `items` into the page selected by `token`.
pub fn paginate<T>(items: Vec<T>, per_page: usize, token: Option<&str>) -> Page<T> {
    let per_page = per_page.max(1);
    let count = items.len();
    let num_pages = page_count(count, per_page);
    let number = resolve_page(token, num_pages);

    let start = (number - 1) * per_page;
    let items = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        number,
        num_pages,
        count,
        per_page,
    }
}
