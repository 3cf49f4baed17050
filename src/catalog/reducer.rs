use std::marker::PhantomData;

use crate::catalog::intent::{ListIntent, LoadKind, StartKind};
use crate::catalog::state::{ListPhase, ListState};
use crate::mvi::Reducer;

/// State transitions of a paginated listing.
pub struct ListReducer<T, Q>(PhantomData<fn() -> (T, Q)>);

impl<T, Q> Reducer for ListReducer<T, Q>
where
    T: Clone + PartialEq + Send + 'static,
    Q: Clone + PartialEq + Send + 'static,
{
    type State = ListState<T, Q>;
    type Intent = ListIntent<T, Q>;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ListIntent::Begin { kind, query } => {
                state.generation += 1;
                state.pending_query = Some(query);
                state.phase = match kind {
                    StartKind::FirstPage => ListPhase::FirstLoading,
                    StartKind::Refresh => ListPhase::Refreshing,
                };
                state
            }
            ListIntent::BeginNextPage => {
                if !state.can_load_more() {
                    return state;
                }
                state.phase = ListPhase::MoreLoading;
                state
            }
            ListIntent::PageArrived {
                generation,
                kind,
                result,
            } => {
                if generation != state.generation {
                    return state;
                }
                match kind {
                    LoadKind::FirstPage | LoadKind::Refresh => {
                        if !matches!(state.phase, ListPhase::FirstLoading | ListPhase::Refreshing) {
                            return state;
                        }
                        match result {
                            Ok(page) => {
                                state.has_more = page.len() >= state.page_size;
                                state.items = page.items;
                                state.meta = page.meta;
                                state.next_page = 2;
                                state.query = state.pending_query.take();
                                state.last_error = None;
                            }
                            Err(message) => {
                                state.pending_query = None;
                                state.last_error = Some(message);
                            }
                        }
                        state.initial_load_completed = true;
                    }
                    LoadKind::NextPage => {
                        if state.phase != ListPhase::MoreLoading {
                            return state;
                        }
                        match result {
                            Ok(page) if page.is_empty() => {
                                state.has_more = false;
                                state.last_error = None;
                            }
                            Ok(page) => {
                                if page.len() < state.page_size {
                                    state.has_more = false;
                                }
                                state.items.extend(page.items);
                                state.meta = page.meta;
                                state.next_page += 1;
                                state.last_error = None;
                            }
                            Err(message) => {
                                state.last_error = Some(message);
                            }
                        }
                    }
                }
                state.phase = ListPhase::Loaded;
                state
            }
        }
    }
}
