use serde::{Deserialize, Serialize};

/// Counters kept by the update coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Every `RequestUpdate` received.
    pub requests: u64,
    /// Requests that carried no usable points.
    pub empty_requests: u64,
    /// Requests dropped because the viewport was not finite.
    pub invalid_requests: u64,
    /// Requests dropped as near-duplicates of the last accepted viewport.
    pub suppressed_similar: u64,
    /// Requests dropped because a computation was running.
    pub dropped_in_flight: u64,
    /// Scheduled computations replaced before they fired.
    pub cancelled_debounces: u64,
    pub cache_hits: u64,
    /// Runs of the grid clusterer.
    pub computations: u64,
    pub published: u64,
    /// Entries currently held by the result cache.
    pub cache_entries: usize,
}
