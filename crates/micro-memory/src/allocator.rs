//! Module-side allocator over a [`LinearMemory`].
//!
//! [`Allocator`] hands out 8-byte-aligned regions starting at the
//! configured heap base. Freed regions go to an offset-sorted free list
//! and are coalesced with their neighbours; allocation tries the free
//! list first (first fit, splitting the remainder) and otherwise bumps
//! the heap top, growing the memory by whole pages when needed.
//!
//! A free range that touches the heap top is folded back into the bump
//! region, so a fully freed heap returns to its initial state.

use indexmap::IndexMap;
use micro_core::{AllocError, Allocation, Ptr};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::{ALLOC_ALIGN, PAGE_SIZE};
use crate::memory::LinearMemory;

/// A disjoint run of reusable bytes below the heap top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FreeRange {
    offset: u64,
    len: u64,
}

impl FreeRange {
    fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// Bookkeeping for one live allocation.
#[derive(Clone, Copy, Debug)]
struct LiveBlock {
    /// Bytes reserved, rounded up to the alignment.
    reserved: u32,
    /// Bytes the caller asked for.
    requested: u32,
}

/// Allocator state for one module instance.
pub struct Allocator {
    heap_base: u64,
    /// Bump cursor: first byte never handed out (or folded back).
    top: u64,
    /// Live allocations keyed by start offset, in allocation order.
    live: IndexMap<u32, LiveBlock>,
    /// Sorted by offset; no two ranges are adjacent.
    free: SmallVec<[FreeRange; 8]>,
    malloc_count: u64,
    free_count: u64,
    reuse_hits: u64,
}

impl Allocator {
    /// Create an empty allocator whose heap starts at `heap_base`.
    pub fn new(heap_base: u32) -> Self {
        Self {
            heap_base: heap_base as u64,
            top: heap_base as u64,
            live: IndexMap::new(),
            free: SmallVec::new(),
            malloc_count: 0,
            free_count: 0,
            reuse_hits: 0,
        }
    }

    /// Reserve `size` bytes inside `memory`.
    ///
    /// The returned region is zero-filled and never overlaps another
    /// live allocation. A zero-size request still reserves one alignment
    /// unit so its pointer is unique.
    pub fn alloc(
        &mut self,
        size: u32,
        memory: &mut LinearMemory,
    ) -> Result<Allocation, AllocError> {
        let reserved = reserved_size(size);
        let max_bytes = memory_limit(memory);
        let oom = || AllocError::OutOfMemory {
            requested: size,
            max_bytes,
        };

        let offset = if let Some(idx) = self.free.iter().position(|r| r.len >= reserved) {
            let range = &mut self.free[idx];
            let offset = range.offset;
            if range.len == reserved {
                self.free.remove(idx);
            } else {
                range.offset += reserved;
                range.len -= reserved;
            }
            self.reuse_hits += 1;
            offset
        } else {
            let offset = self.top;
            let end = offset + reserved;
            if end > memory.size() {
                let pages = (end - memory.size()).div_ceil(PAGE_SIZE as u64);
                let pages = u32::try_from(pages).map_err(|_| oom())?;
                memory.grow(pages).map_err(|_| oom())?;
            }
            self.top = end;
            offset
        };

        // offset + reserved <= memory size <= 2^32, and reserved >= 8.
        let ptr = Ptr(offset as u32);
        memory
            .slice_mut(ptr, reserved)
            .map_err(|_| oom())?
            .fill(0);

        self.live.insert(
            ptr.0,
            LiveBlock {
                reserved: reserved as u32,
                requested: size,
            },
        );
        self.malloc_count += 1;
        debug!(%ptr, size, reserved, "malloc");
        Ok(Allocation {
            ptr,
            len_bytes: size,
        })
    }

    /// Release the allocation starting at `ptr`.
    ///
    /// Returns the freed allocation, or `Ok(None)` for the null pointer.
    /// A pointer that is not the start of a live allocation (including
    /// a second free of the same pointer) is rejected.
    pub fn free(&mut self, ptr: Ptr) -> Result<Option<Allocation>, AllocError> {
        if ptr.is_null() {
            return Ok(None);
        }
        let Some(block) = self.live.swap_remove(&ptr.0) else {
            warn!(%ptr, "rejected free of non-live pointer");
            return Err(AllocError::InvalidFree { ptr });
        };
        self.release_range(FreeRange {
            offset: ptr.0 as u64,
            len: block.reserved as u64,
        });
        self.free_count += 1;
        debug!(%ptr, reserved = block.reserved, "free");
        Ok(Some(Allocation {
            ptr,
            len_bytes: block.requested,
        }))
    }

    /// Insert a range into the free list, merging with neighbours and
    /// folding a trailing range back into the bump region.
    fn release_range(&mut self, mut range: FreeRange) {
        let idx = self.free.partition_point(|r| r.offset < range.offset);

        let merges_next = self
            .free
            .get(idx)
            .is_some_and(|next| range.end() == next.offset);
        if merges_next {
            range.len += self.free.remove(idx).len;
        }

        let merges_prev = idx > 0 && self.free[idx - 1].end() == range.offset;
        if merges_prev {
            self.free[idx - 1].len += range.len;
        } else {
            self.free.insert(idx, range);
        }

        if let Some(last) = self.free.last() {
            if last.end() == self.top {
                self.top = last.offset;
                self.free.pop();
            }
        }
    }

    /// Look up the live allocation that starts at `ptr`.
    pub fn allocation(&self, ptr: Ptr) -> Option<Allocation> {
        self.live.get(&ptr.0).map(|block| Allocation {
            ptr,
            len_bytes: block.requested,
        })
    }

    /// Iterate over live allocations in allocation order.
    pub fn live_allocations(&self) -> impl Iterator<Item = Allocation> + '_ {
        self.live.iter().map(|(&ptr, block)| Allocation {
            ptr: Ptr(ptr),
            len_bytes: block.requested,
        })
    }

    /// Number of live allocations.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Bytes reserved by live allocations, including padding.
    pub fn bytes_in_use(&self) -> u64 {
        self.live.values().map(|b| b.reserved as u64).sum()
    }

    /// Number of disjoint free ranges below the heap top.
    pub fn free_ranges(&self) -> usize {
        self.free.len()
    }

    /// First offset handed out by this allocator.
    pub fn heap_base(&self) -> u64 {
        self.heap_base
    }

    /// Current bump cursor.
    pub fn heap_top(&self) -> u64 {
        self.top
    }

    /// Cumulative successful allocations.
    pub fn malloc_count(&self) -> u64 {
        self.malloc_count
    }

    /// Cumulative successful frees.
    pub fn free_count(&self) -> u64 {
        self.free_count
    }

    /// Cumulative allocations satisfied from the free list.
    pub fn reuse_hits(&self) -> u64 {
        self.reuse_hits
    }
}

/// Bytes actually reserved for a request of `size` bytes.
pub fn reserved_size(size: u32) -> u64 {
    let align = ALLOC_ALIGN as u64;
    (size as u64).max(1).div_ceil(align) * align
}

fn memory_limit(memory: &LinearMemory) -> u64 {
    memory.max_pages() as u64 * PAGE_SIZE as u64
}
