/// Page size defaults and ceiling applied to client-supplied pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl PaginationPolicy {
    pub const DEFAULT_PER_PAGE: u32 = 10;
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn new(default_per_page: u32, max_per_page: u32) -> Self {
        let max_per_page = max_per_page.max(1);
        Self {
            default_per_page: default_per_page.clamp(1, max_per_page),
            max_per_page,
        }
    }

    /// Resolve raw query values into a page request.
    ///
    /// Missing or non-positive values fall back to page 1 and the default
    /// page size; larger sizes are capped at `max_per_page`.
    pub fn resolve(&self, page: Option<u32>, per_page: Option<u32>) -> PageRequest {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let per_page = per_page
            .filter(|n| *n >= 1)
            .map_or(self.default_per_page, |n| n.min(self.max_per_page));

        PageRequest { page, per_page }
    }
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PER_PAGE, Self::MAX_PER_PAGE)
    }
}

/// One-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Number of records preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// A slice of records plus the position of that slice in the full set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total_count,
        }
    }

    /// `ceil(total_count / per_page)`; zero when there are no records.
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.per_page.max(1)))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}
