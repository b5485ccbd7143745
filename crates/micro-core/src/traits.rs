//! The call surface a numeric module exposes to its host.

use crate::error::{AllocError, MemoryError};
use crate::id::{MemoryEpoch, Ptr};
use crate::metrics::MemoryMetrics;

/// A computational unit that owns a linear memory region.
///
/// The host calls arithmetic entry points directly and, for the raw
/// path, allocates inside the module's memory, writes encoded integers
/// through [`memory_mut`](NumericModule::memory_mut), and passes an
/// offset and element count to [`sum`](NumericModule::sum).
///
/// All mutation goes through `&mut self`, so one instance is never
/// shared between callers without external synchronisation.
pub trait NumericModule {
    /// Wrapping 32-bit addition.
    fn add(&self, a: i32, b: i32) -> i32;

    /// Wrapping sum of `len` little-endian `i32`s starting at `ptr`.
    ///
    /// `len == 0` returns `Ok(0)` without touching memory. A range that
    /// does not fit inside the region returns
    /// [`MemoryError::OutOfBounds`].
    fn sum(&self, ptr: Ptr, len: u32) -> Result<i32, MemoryError>;

    /// Reserve `size` bytes and return the start offset.
    fn malloc(&mut self, size: u32) -> Result<Ptr, AllocError>;

    /// Release an allocation previously returned by
    /// [`malloc`](NumericModule::malloc). Freeing null is a no-op.
    fn free(&mut self, ptr: Ptr) -> Result<(), AllocError>;

    /// The whole memory region as bytes.
    fn memory(&self) -> &[u8];

    /// The whole memory region as mutable bytes.
    fn memory_mut(&mut self) -> &mut [u8];

    /// The region's current growth epoch.
    fn memory_epoch(&self) -> MemoryEpoch;

    /// Current size of the region in bytes.
    fn memory_size(&self) -> u64 {
        self.memory().len() as u64
    }

    /// Snapshot of memory and allocator state.
    fn metrics(&self) -> MemoryMetrics;
}
