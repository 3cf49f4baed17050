//! Model-View-Intent (MVI) primitives for screen-facing state.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Screen
//!    ↑                               │
//!    └── fetch results ◀── Controller ┘
//! ```
//!
//! Controllers perform I/O and feed the results back as intents; reducers
//! stay pure so every state transition can be tested without a network.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::ViewState;
