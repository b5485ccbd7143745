//! Error types for linear memory access and allocation.
//!
//! Split by subsystem: [`MemoryError`] for reads, writes, views and
//! growth; [`AllocError`] for the module allocator.

use std::error::Error;
use std::fmt;

use crate::id::{MemoryEpoch, Ptr};

/// Errors from accessing or growing a linear memory region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemoryError {
    /// The byte range `[offset, offset + len)` is not inside the region.
    OutOfBounds {
        /// Start of the requested range.
        offset: Ptr,
        /// Length of the requested range in bytes.
        len: u64,
        /// Current size of the region in bytes.
        memory_size: u64,
    },
    /// A buffer handle was minted before the region last grew.
    StaleHandle {
        /// The epoch recorded in the handle.
        handle_epoch: MemoryEpoch,
        /// The region's current epoch.
        current_epoch: MemoryEpoch,
    },
    /// Growing the region would exceed its page limit.
    GrowthLimit {
        /// Total pages the growth would have produced.
        requested_pages: u64,
        /// Configured maximum number of pages.
        max_pages: u32,
    },
    /// A typed write supplied a different number of values than the view holds.
    LengthMismatch {
        /// Number of values the view holds.
        expected: u32,
        /// Number of values supplied.
        actual: usize,
    },
    /// An element index past the end of a typed view.
    IndexOutOfRange {
        /// The rejected index.
        index: u32,
        /// Number of values the view holds.
        len: u32,
    },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                offset,
                len,
                memory_size,
            } => write!(
                f,
                "out of bounds memory access: {len} bytes at {offset}, memory size {memory_size} bytes"
            ),
            Self::StaleHandle {
                handle_epoch,
                current_epoch,
            } => write!(
                f,
                "stale buffer handle: minted in epoch {handle_epoch}, memory is at epoch {current_epoch}"
            ),
            Self::GrowthLimit {
                requested_pages,
                max_pages,
            } => write!(
                f,
                "memory growth to {requested_pages} pages exceeds limit of {max_pages} pages"
            ),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "view holds {expected} values, got {actual}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for view of {len} values")
            }
        }
    }
}

impl Error for MemoryError {}

/// Errors from the module allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The region cannot grow far enough to satisfy the request.
    OutOfMemory {
        /// Number of bytes requested.
        requested: u32,
        /// Largest size the region may reach, in bytes.
        max_bytes: u64,
    },
    /// The pointer is not the start of a live allocation.
    ///
    /// Covers double frees and pointers into the middle of a region.
    InvalidFree {
        /// The rejected pointer.
        ptr: Ptr,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                max_bytes,
            } => write!(
                f,
                "out of memory: cannot allocate {requested} bytes, memory limit {max_bytes} bytes"
            ),
            Self::InvalidFree { ptr } => {
                write!(f, "free of {ptr} which is not a live allocation")
            }
        }
    }
}

impl Error for AllocError {}
