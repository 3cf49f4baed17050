/// Marker trait for screen-facing state.
///
/// States are cloned out of controllers as snapshots and compared to
/// detect changes, hence `Clone + PartialEq`.
pub trait ViewState: Clone + PartialEq + Default + Send + 'static {}
