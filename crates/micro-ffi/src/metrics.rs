//! C-compatible memory metrics.

use micro_core::MemoryMetrics;

/// Snapshot of a module's memory and allocator state.
///
/// Fixed-width fields only, for ABI portability.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MicroMemoryMetrics {
    /// Current size of the memory in bytes.
    pub memory_bytes: u64,
    /// Bytes reserved by live allocations, including alignment padding.
    pub bytes_in_use: u64,
    /// Offset of the allocator's bump cursor.
    pub heap_top: u64,
    /// Cumulative number of memory growths.
    pub grow_events: u64,
    /// Cumulative number of successful allocations.
    pub malloc_count: u64,
    /// Cumulative number of successful frees.
    pub free_count: u64,
    /// Cumulative number of allocations served from freed space.
    pub reuse_hits: u64,
    /// Current number of pages.
    pub pages: u32,
    /// Number of live allocations.
    pub live_allocations: u32,
    /// Number of disjoint free ranges.
    pub free_ranges: u32,
}

// 7×u64 + 3×u32 + 4 bytes padding = 72 bytes, align 8.
const _: () = assert!(std::mem::size_of::<MicroMemoryMetrics>() == 72);
const _: () = assert!(std::mem::align_of::<MicroMemoryMetrics>() == 8);

impl MicroMemoryMetrics {
    pub(crate) fn from_rust(m: &MemoryMetrics) -> Self {
        let narrow = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        Self {
            memory_bytes: m.memory_bytes,
            bytes_in_use: m.bytes_in_use,
            heap_top: m.heap_top,
            grow_events: m.grow_events,
            malloc_count: m.malloc_count,
            free_count: m.free_count,
            reuse_hits: m.reuse_hits,
            pages: m.pages,
            live_allocations: narrow(m.live_allocations),
            free_ranges: narrow(m.free_ranges),
        }
    }
}
