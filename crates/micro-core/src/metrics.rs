//! Memory and allocator metrics for a module instance.
//!
//! [`MemoryMetrics`] is a point-in-time snapshot. Cumulative counters
//! count events since the module was created.

/// Size and allocator state of a module's linear memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryMetrics {
    /// Current number of pages.
    pub pages: u32,
    /// Current size of the region in bytes.
    pub memory_bytes: u64,
    /// Number of live allocations.
    pub live_allocations: usize,
    /// Bytes reserved by live allocations, including alignment padding.
    pub bytes_in_use: u64,
    /// Number of disjoint free ranges available for reuse.
    pub free_ranges: usize,
    /// Offset of the bump cursor (first byte never handed out).
    pub heap_top: u64,
    /// Cumulative number of successful growths.
    pub grow_events: u64,
    /// Cumulative number of successful allocations.
    pub malloc_count: u64,
    /// Cumulative number of successful frees.
    pub free_count: u64,
    /// Cumulative number of allocations satisfied from a free range.
    pub reuse_hits: u64,
}
