//! Document configuration parameters.

/// Sizing hints for a [`Document`](crate::Document).
#[derive(Clone, Debug)]
pub struct DocumentConfig {
    /// Number of node slots reserved up front.
    ///
    /// Default: 64. Documents grow past this on demand.
    pub initial_nodes: usize,
    /// Hard upper bound on allocated nodes, root included.
    ///
    /// Default: 16_777_216. Clamped to the `NodeId` range.
    pub max_nodes: usize,
}

impl DocumentConfig {
    /// Default number of pre-reserved node slots.
    pub const DEFAULT_INITIAL_NODES: usize = 64;

    /// Default node budget.
    pub const DEFAULT_MAX_NODES: usize = 1 << 24;
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            initial_nodes: Self::DEFAULT_INITIAL_NODES,
            max_nodes: Self::DEFAULT_MAX_NODES,
        }
    }
}
