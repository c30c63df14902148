//! Counters describing a universe's activity.
//!
//! [`UniverseMetrics`] is cumulative over the universe's lifetime except
//! for the `live_*` and `heap_*` gauges, which are sampled when
//! [`Universe::metrics`](crate::Universe::metrics) is called.

/// Activity counters and memory gauges for one universe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniverseMetrics {
    /// Top-level objects created.
    pub objects_created: u64,
    /// Top-level objects destructed by `destroy` or `clear`.
    pub objects_destroyed: u64,
    /// Identifier requests that could not be granted verbatim.
    pub synthesized_names: u64,
    /// Completed scene loads.
    pub loads: u64,
    /// Issues recovered from during loads.
    pub load_issues: u64,
    /// Completed scene saves.
    pub saves: u64,
    /// Update passes run.
    pub update_passes: u64,
    /// Slot invocations caused by `emit`.
    pub slot_invocations: u64,
    /// Live top-level objects.
    pub live_objects: usize,
    /// Live headers, aspects included.
    pub live_headers: usize,
    /// Heap cells handed out since the last clear.
    pub heap_cells_used: usize,
}
