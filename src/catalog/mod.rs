//! Paginated catalog listings ("infinite scroll").
//!
//! [`ListController`] issues fetches against a [`PageSource`] and feeds the
//! results through [`ListReducer`], which owns every state transition.

mod controller;
mod intent;
mod reducer;
mod source;
mod state;

pub use controller::{ListController, LoadOutcome};
pub use intent::{FetchResult, ListIntent, LoadKind, StartKind};
pub use reducer::ListReducer;
pub use source::{CategoryPages, PageSource, ProductPages, TrendingPages};
pub use state::{ListPhase, ListState, DEFAULT_PAGE_SIZE};
