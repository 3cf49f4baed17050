use crate::api::Page;
use crate::mvi::Intent;

/// Which kind of request a response answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    FirstPage,
    Refresh,
    NextPage,
}

/// How a page-1 request is presented: first load (skeleton) or
/// pull-to-refresh (spinner over the current items).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartKind {
    FirstPage,
    Refresh,
}

impl From<StartKind> for LoadKind {
    fn from(kind: StartKind) -> Self {
        match kind {
            StartKind::FirstPage => LoadKind::FirstPage,
            StartKind::Refresh => LoadKind::Refresh,
        }
    }
}

/// Result of one page fetch as seen by the reducer.
pub type FetchResult<T> = Result<Page<T>, String>;

#[derive(Debug)]
pub enum ListIntent<T, Q> {
    /// Page 1 requested for `query`. Starts a new generation.
    Begin { kind: StartKind, query: Q },
    /// Next page requested with the current query.
    BeginNextPage,
    /// A response arrived for the request tagged `generation`.
    PageArrived {
        generation: u64,
        kind: LoadKind,
        result: FetchResult<T>,
    },
}

impl<T, Q> Intent for ListIntent<T, Q>
where
    T: Send + 'static,
    Q: Send + 'static,
{
}
