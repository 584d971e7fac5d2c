use payloads::responses::ListPage;
use payloads::{Filters, ListQuery, Pagination};

/// Distinguishes "never loaded" from "loaded, possibly empty".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    NotFetched,
    Fetched(T),
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchState::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            FetchState::Fetched(data) => Some(data),
            FetchState::NotFetched => None,
        }
    }
}

/// Everything a list page renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub data: FetchState<Vec<T>>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
    pub filters: Filters,
    pub(crate) in_flight: usize,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(Filters::new(), Pagination::default())
    }
}

impl<T> ListState<T> {
    pub fn new(filters: Filters, pagination: Pagination) -> Self {
        Self {
            data: FetchState::NotFetched,
            loading: false,
            error: None,
            pagination,
            filters,
            in_flight: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        self.data.as_ref().map(Vec::as_slice).unwrap_or(&[])
    }

    /// True while the first load is running and nothing is on screen yet.
    pub fn is_initial_loading(&self) -> bool {
        self.loading && !self.data.is_fetched() && self.error.is_none()
    }

    /// The request parameters this state would fetch with.
    pub fn query(&self) -> ListQuery {
        ListQuery::new(&self.pagination, &self.filters)
    }

    pub(crate) fn apply_page(&mut self, page: ListPage<T>) {
        if let Some(total) = page.total {
            self.pagination.total = total;
        }
        self.data = FetchState::Fetched(page.items);
        self.error = None;
    }
}
