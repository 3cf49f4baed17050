/// Marker trait for intent objects.
///
/// Intents are either caller actions (load, refresh, scroll) or the
/// results of I/O started by a controller. Reducers consume them.
pub trait Intent: Send + 'static {}
