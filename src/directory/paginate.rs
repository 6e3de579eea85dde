use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    ALL_LABEL, DEFAULT_PAGE_SIZE, PAGE_SIZE_CHOICES, PAGE_WINDOW_RADIUS, PAGE_WINDOW_THRESHOLD,
};

/// Rows per page, or everything on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum PageSize {
    Rows(NonZeroUsize),
    All,
}

impl Default for PageSize {
    fn default() -> Self {
        Self::rows(DEFAULT_PAGE_SIZE)
    }
}

impl PageSize {
    /// Bounded page size; zero is treated as one
    pub fn rows(n: usize) -> Self {
        Self::Rows(NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN))
    }

    /// The selector's options: 10, 20, 50, 100, all
    pub fn choices() -> Vec<PageSize> {
        PAGE_SIZE_CHOICES
            .iter()
            .map(|&n| Self::rows(n))
            .chain(std::iter::once(Self::All))
            .collect()
    }

    /// Next option in the selector, wrapping
    pub fn next(&self) -> Self {
        let choices = Self::choices();
        match choices.iter().position(|c| c == self) {
            Some(i) => choices[(i + 1) % choices.len()],
            None => Self::default(),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows(n) => write!(f, "{}", n),
            Self::All => f.write_str(ALL_LABEL),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case(ALL_LABEL) {
            return Ok(Self::All);
        }
        s.parse::<NonZeroUsize>()
            .map(Self::Rows)
            .map_err(|_| format!("invalid page size '{}': expected a positive number or 'all'", s))
    }
}

// Config files may say `10` or `"10"`; environment overrides arrive as numbers
impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PageSizeVisitor;

        impl Visitor<'_> for PageSizeVisitor {
            type Value = PageSize;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a positive number or \"all\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PageSize, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PageSize, E> {
                NonZeroUsize::new(v as usize)
                    .map(PageSize::Rows)
                    .ok_or_else(|| E::custom("page size must be positive"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PageSize, E> {
                if v <= 0 {
                    return Err(E::custom("page size must be positive"));
                }
                self.visit_u64(v as u64)
            }
        }

        deserializer.deserialize_any(PageSizeVisitor)
    }
}

impl From<PageSize> for String {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Rows(n) => n.to_string(),
            PageSize::All => "all".to_string(),
        }
    }
}

/// One page of a filtered sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based index this page was cut at
    pub index: usize,
    pub total_pages: usize,
    /// Length of the whole sequence
    pub total_items: usize,
    pub size: PageSize,
}

impl<'a, T> Page<'a, T> {
    /// 1-based (first, last, total) for "showing X to Y of Z"; first is 0 when empty
    pub fn range(&self) -> (usize, usize, usize) {
        if self.items.is_empty() {
            return (0, 0, self.total_items);
        }
        let first = match self.size {
            PageSize::All => 1,
            PageSize::Rows(n) => (self.index.max(1) - 1) * n.get() + 1,
        };
        (first, first + self.items.len() - 1, self.total_items)
    }
}

/// Total pages for a sequence length; never less than one
pub fn total_pages(len: usize, size: PageSize) -> usize {
    match size {
        PageSize::All => 1,
        PageSize::Rows(n) => len.div_ceil(n.get()).max(1),
    }
}

/// Slice page `index` (1-based) out of `items`. Past-the-end pages are empty.
pub fn paginate<T>(items: &[T], index: usize, size: PageSize) -> Page<'_, T> {
    let total = total_pages(items.len(), size);
    let slice = match size {
        PageSize::All => items,
        PageSize::Rows(n) => {
            let start = index.saturating_sub(1).saturating_mul(n.get()).min(items.len());
            let end = start.saturating_add(n.get()).min(items.len());
            &items[start..end]
        }
    };

    Page {
        items: slice,
        index,
        total_pages: total,
        total_items: items.len(),
        size,
    }
}

/// Bring a page index into `[1, total]`
pub fn clamp_page(index: usize, total: usize) -> usize {
    index.clamp(1, total.max(1))
}

/// One button in the page strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Page buttons around `current`. Beyond five pages, only the first, the last
/// and pages within two of the current one are shown; a page exactly three
/// away becomes a gap marker.
pub fn page_window(current: usize, total: usize) -> Vec<PageLink> {
    (1..=total)
        .filter_map(|page| {
            let distance = page.abs_diff(current);
            let hidden = total > PAGE_WINDOW_THRESHOLD
                && distance > PAGE_WINDOW_RADIUS
                && page != 1
                && page != total;
            if !hidden {
                Some(PageLink::Page(page))
            } else if distance == PAGE_WINDOW_RADIUS + 1 {
                Some(PageLink::Gap)
            } else {
                None
            }
        })
        .collect()
}
