use serde_json::Value;

use crate::mvi::ViewState;

/// Default threshold below which a page is treated as the last one.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Where a list is in its load cycle.
///
/// A single phase makes "loading more" and "refreshing" mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    /// First page requested, nothing shown yet.
    FirstLoading,
    /// Settled; the last request succeeded or failed.
    Loaded,
    /// Next page requested (footer spinner).
    MoreLoading,
    /// Page 1 re-requested (pull-to-refresh spinner).
    Refreshing,
}

impl ListPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::FirstLoading | Self::MoreLoading | Self::Refreshing)
    }
}

/// Cumulative state of one paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T, Q> {
    /// Items in page arrival order. Not deduplicated.
    pub items: Vec<T>,
    /// Page number the next `load_next_page` will request.
    pub next_page: u32,
    pub has_more: bool,
    /// Set once the first page has resolved, successfully or not.
    pub initial_load_completed: bool,
    pub phase: ListPhase,
    /// Bumped on every first-page load; responses tagged with an older
    /// generation are discarded.
    pub generation: u64,
    /// Query the accumulated items belong to. Only a successful first page
    /// replaces it; next-page requests always use it.
    pub query: Option<Q>,
    /// Query of the in-flight first-page request. Promoted to `query` on
    /// success, dropped on failure.
    pub pending_query: Option<Q>,
    /// Pagination metadata of the latest applied page.
    pub meta: Option<Value>,
    /// Message of the latest failed fetch; cleared by the next success.
    pub last_error: Option<String>,
    pub page_size: usize,
}

impl<T, Q> ListState<T, Q> {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            next_page: 1,
            has_more: true,
            initial_load_completed: false,
            phase: ListPhase::Idle,
            generation: 0,
            query: None,
            pending_query: None,
            meta: None,
            last_error: None,
            page_size: page_size.max(1),
        }
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == ListPhase::MoreLoading
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == ListPhase::Refreshing
    }

    /// Nothing to show yet and a request is running (skeleton screen).
    pub fn is_initial_loading(&self) -> bool {
        !self.initial_load_completed && self.phase.is_loading()
    }

    /// Settled with nothing to show ("no results").
    pub fn is_empty_result(&self) -> bool {
        self.initial_load_completed && !self.phase.is_loading() && self.items.is_empty()
    }

    /// Whether a next-page request may start now.
    ///
    /// Requires a settled list with a known query and more pages to fetch.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.phase.is_loading() && self.query.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T, Q> Default for ListState<T, Q> {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl<T, Q> ViewState for ListState<T, Q>
where
    T: Clone + PartialEq + Send + 'static,
    Q: Clone + PartialEq + Send + 'static,
{
}
