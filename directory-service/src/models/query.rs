//! Directory query values: sort whitelist, normalized paging request, and
//! the paged result envelope.

/// Columns that may legally appear in an ORDER BY clause. Anything else
/// falls back to the default; raw request input never reaches the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Username,
    Name,
    Role,
}

impl SortColumn {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("username") => SortColumn::Username,
            Some("name") => SortColumn::Name,
            Some("role") => SortColumn::Role,
            _ => SortColumn::Id,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Username => "username",
            SortColumn::Name => "name",
            SortColumn::Role => "role",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") | Some("descending") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Maximum page size; bounds response size and per-call work.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized directory query. Construction clamps paging values and
/// resolves the sort whitelist so the store never sees raw request input.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub page: i64,
    pub page_size: i64,
    pub search: Option<String>,
    pub sort: SortColumn,
    pub direction: SortDirection,
}

impl UserQuery {
    pub fn from_parts(
        page: i64,
        page_size: i64,
        search_term: Option<&str>,
        sort_by: Option<&str>,
        sort_direction: Option<&str>,
    ) -> Self {
        let search = search_term
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            search,
            sort: SortColumn::parse(sort_by),
            direction: SortDirection::parse(sort_direction),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// One page of results plus the total matching count. The remaining
/// pagination metadata is derived, never stored.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}
