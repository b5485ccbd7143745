//! Strongly-typed offsets, allocations, and memory epochs.

use std::fmt;

/// Width in bytes of one encoded integer in module memory.
pub const INT_SIZE: u32 = 4;

/// A byte offset into a module's linear memory.
///
/// This is not a machine address: it is only meaningful relative to the
/// memory region of the module instance that produced it. `Ptr(0)` is
/// the null sentinel and is never returned by a successful allocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ptr(pub u32);

impl Ptr {
    /// The null offset.
    pub const NULL: Ptr = Ptr(0);

    /// Whether this is the null offset.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The offset as a `usize` index into the memory bytes.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Ptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u32> for Ptr {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A live region handed out by a module's allocator.
///
/// Valid until freed. Callers must not read or write outside
/// `[ptr, ptr + len_bytes)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Allocation {
    /// Start of the region.
    pub ptr: Ptr,
    /// Usable length of the region in bytes, as requested.
    pub len_bytes: u32,
}

impl Allocation {
    /// Exclusive end offset of the region.
    pub fn end(&self) -> u64 {
        self.ptr.0 as u64 + self.len_bytes as u64
    }

    /// Number of whole encoded integers that fit in the region.
    pub fn int_capacity(&self) -> u32 {
        self.len_bytes / INT_SIZE
    }

    /// Whether two allocations share at least one byte.
    pub fn overlaps(&self, other: &Allocation) -> bool {
        (self.ptr.0 as u64) < other.end() && (other.ptr.0 as u64) < self.end()
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Allocation(ptr={}, len={})", self.ptr, self.len_bytes)
    }
}

/// Growth counter of a linear memory region.
///
/// Incremented every time the region grows. Anything that caches a view
/// description across calls records the epoch it was minted in, so a
/// description that predates a growth is detectably stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryEpoch(pub u64);

impl MemoryEpoch {
    /// The epoch that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MemoryEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MemoryEpoch {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_ptr_is_null() {
        assert!(Ptr::NULL.is_null());
        assert!(!Ptr(8).is_null());
    }

    #[test]
    fn ptr_displays_as_hex() {
        assert_eq!(Ptr(1024).to_string(), "0x400");
    }

    #[test]
    fn allocation_end_does_not_wrap() {
        let a = Allocation {
            ptr: Ptr(u32::MAX - 3),
            len_bytes: 8,
        };
        assert_eq!(a.end(), u32::MAX as u64 + 5);
    }

    #[test]
    fn adjacent_allocations_do_not_overlap() {
        let a = Allocation {
            ptr: Ptr(1024),
            len_bytes: 16,
        };
        let b = Allocation {
            ptr: Ptr(1040),
            len_bytes: 4,
        };
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        let c = Allocation {
            ptr: Ptr(1036),
            len_bytes: 8,
        };
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn int_capacity_truncates() {
        let a = Allocation {
            ptr: Ptr(8),
            len_bytes: 14,
        };
        assert_eq!(a.int_capacity(), 3);
    }

    #[test]
    fn epoch_next_increments() {
        assert_eq!(MemoryEpoch(3).next(), MemoryEpoch(4));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlap_is_symmetric(
                p1 in 0u32..4096, l1 in 0u32..256,
                p2 in 0u32..4096, l2 in 0u32..256,
            ) {
                let a = Allocation { ptr: Ptr(p1), len_bytes: l1 };
                let b = Allocation { ptr: Ptr(p2), len_bytes: l2 };
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }
        }
    }
}
