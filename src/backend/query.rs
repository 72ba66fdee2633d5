//! List query parameters and filter-expression helpers.
//!
//! The backend filters with a small expression language; values are wrapped
//! in single quotes, so ids taken from records must be escaped before they
//! are spliced into an expression.

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

/// Backend default when a caller does not pick a page size.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Pagination, filtering, ordering and relation expansion for `get_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub expand: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PER_PAGE, sort: None, filter: None, expand: None }
    }
}

impl ListQuery {
    #[must_use]
    pub fn page(page: u32, per_page: u32) -> Self {
        Self { page: page.max(1), per_page: per_page.max(1), ..Self::default() }
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Query-string pairs in the backend's parameter names.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("perPage", self.per_page.to_string())];
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if let Some(expand) = &self.expand {
            pairs.push(("expand", expand.clone()));
        }
        pairs
    }
}

/// Quote a literal for use inside a filter expression.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// `field ~ 'value'`: array-contains for relation lists, substring otherwise.
#[must_use]
pub fn contains(field: &str, value: &str) -> String {
    format!("{field} ~ {}", quote(value))
}

/// `field = 'value'`.
#[must_use]
pub fn equals(field: &str, value: &str) -> String {
    format!("{field} = {}", quote(value))
}

/// Descending sort on `field`.
#[must_use]
pub fn sort_desc(field: &str) -> String {
    format!("-{field}")
}
