use parking_lot::Mutex;

use crate::api::{ApiError, Page};
use crate::catalog::intent::{ListIntent, LoadKind, StartKind};
use crate::catalog::reducer::ListReducer;
use crate::catalog::source::PageSource;
use crate::catalog::state::{ListState, DEFAULT_PAGE_SIZE};
use crate::mvi::Reducer;

/// What a load call did, for callers that want to react without diffing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A non-empty page was applied.
    Loaded { count: usize },
    /// The request succeeded with no items.
    Empty,
    /// The request failed; state kept its items.
    Failed { message: String },
    /// Nothing was requested (exhausted, busy, or nothing loaded yet).
    Skipped,
    /// A newer first-page load superseded this request; its result was dropped.
    Stale,
}

type SourceState<S> = ListState<<S as PageSource>::Item, <S as PageSource>::Query>;

/// Drives paged retrieval for one listing.
///
/// Methods take `&self` so a screen can start a refresh while a
/// next-page request is still in flight. The state lock is never held
/// across a fetch.
pub struct ListController<S: PageSource> {
    source: S,
    state: Mutex<SourceState<S>>,
}

impl<S: PageSource> ListController<S> {
    pub fn new(source: S) -> Self {
        Self::with_page_size(source, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(source: S, page_size: usize) -> Self {
        Self {
            source,
            state: Mutex::new(ListState::with_page_size(page_size)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SourceState<S> {
        self.state.lock().clone()
    }

    /// Inspect state without cloning the items.
    pub fn read<R>(&self, f: impl FnOnce(&SourceState<S>) -> R) -> R {
        f(&self.state.lock())
    }

    /// Request page 1 for `query`, replacing whatever is loaded on success.
    pub async fn load_first_page(&self, query: S::Query) -> LoadOutcome {
        self.start_over(StartKind::FirstPage, query).await
    }

    /// Same as [`load_first_page`](Self::load_first_page), reported as a refresh.
    pub async fn refresh(&self, query: S::Query) -> LoadOutcome {
        self.start_over(StartKind::Refresh, query).await
    }

    /// Refresh with the query of the items currently shown.
    pub async fn refresh_current(&self) -> LoadOutcome {
        let current = self.read(|s| s.query.clone());
        match current {
            Some(query) => self.refresh(query).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Switch to `query`. Re-submitting the query already shown or already
    /// being loaded does nothing.
    pub async fn apply_query(&self, query: S::Query) -> LoadOutcome {
        let unchanged = self.read(|s| match &s.pending_query {
            Some(pending) if s.phase.is_loading() => *pending == query,
            _ => s.query.as_ref() == Some(&query),
        });
        if unchanged {
            return LoadOutcome::Skipped;
        }
        self.load_first_page(query).await
    }

    /// Append the next page of the current query.
    pub async fn load_next_page(&self) -> LoadOutcome {
        let (generation, query, page) = {
            let mut state = self.state.lock();
            if !state.can_load_more() {
                return LoadOutcome::Skipped;
            }
            // Continue the query the shown items belong to. A failed query
            // change never replaces `query`, so paging resumes the old list.
            let Some(query) = state.query.clone() else {
                return LoadOutcome::Skipped;
            };
            let page = state.next_page;
            let generation = state.generation;
            Self::apply(&mut state, ListIntent::BeginNextPage);
            (generation, query, page)
        };

        tracing::debug!(source = self.source.name(), page, "Loading next page");
        let result = self.source.fetch_page(&query, page).await;
        self.finish(generation, LoadKind::NextPage, page, result)
    }

    async fn start_over(&self, kind: StartKind, query: S::Query) -> LoadOutcome {
        let generation = {
            let mut state = self.state.lock();
            Self::apply(
                &mut state,
                ListIntent::Begin {
                    kind,
                    query: query.clone(),
                },
            );
            state.generation
        };

        tracing::debug!(source = self.source.name(), ?kind, generation, "Loading first page");
        let result = self.source.fetch_page(&query, 1).await;
        self.finish(generation, kind.into(), 1, result)
    }

    fn finish(
        &self,
        generation: u64,
        kind: LoadKind,
        page: u32,
        result: Result<Page<S::Item>, ApiError>,
    ) -> LoadOutcome {
        let result = result.map_err(|e| {
            tracing::warn!(
                source = self.source.name(),
                page,
                error_kind = e.kind(),
                error = %e,
                "Page fetch failed"
            );
            e.to_string()
        });

        let outcome = match &result {
            Ok(p) if p.is_empty() => LoadOutcome::Empty,
            Ok(p) => LoadOutcome::Loaded { count: p.len() },
            Err(message) => LoadOutcome::Failed {
                message: message.clone(),
            },
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(
                source = self.source.name(),
                generation,
                current = state.generation,
                "Discarding stale page"
            );
            return LoadOutcome::Stale;
        }

        Self::apply(
            &mut state,
            ListIntent::PageArrived {
                generation,
                kind,
                result,
            },
        );
        outcome
    }

    fn apply(state: &mut SourceState<S>, intent: ListIntent<S::Item, S::Query>) {
        let current = std::mem::take(state);
        *state = ListReducer::<S::Item, S::Query>::reduce(current, intent);
    }
}
