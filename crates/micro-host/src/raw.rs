//! Raw-path buffer leases.
//!
//! A [`RawBuffer`] carries out the pointer/length handshake in one place:
//! size the request (`count * 4`, checked), `malloc` inside the module,
//! write the integers through a bounds-checked view, then hand the
//! module the same offset and count it was allocated with. The pointer
//! and count never travel separately, so a sum cannot be asked for a
//! length the buffer was not sized for.
//!
//! The lease holds `&mut` on the module, which rules out calls that
//! might grow memory while it is alive. Dropping the lease frees the
//! allocation; [`RawBuffer::leak`] is the only way to keep it.

use micro_core::{Allocation, MemoryError, NumericModule, Ptr, INT_SIZE};
use micro_memory::{BufferHandle, I32View, I32ViewMut};
use tracing::{debug, warn};

use crate::error::HostError;

/// An allocation of `count` integers inside a module's memory.
pub struct RawBuffer<'m, M: NumericModule> {
    module: &'m mut M,
    /// `None` once released or leaked, and for empty buffers.
    allocation: Option<Allocation>,
    count: u32,
}

impl<'m, M: NumericModule> RawBuffer<'m, M> {
    /// Lease room for `count` integers.
    ///
    /// `count == 0` does not call `malloc`; the buffer is empty and sums
    /// to zero.
    pub fn alloc(module: &'m mut M, count: usize) -> Result<Self, HostError> {
        let size = u32::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(INT_SIZE))
            .ok_or(HostError::TooLarge { count })?;
        let count = size / INT_SIZE;
        if count == 0 {
            return Ok(Self {
                module,
                allocation: None,
                count: 0,
            });
        }
        let ptr = module.malloc(size)?;
        debug!(%ptr, count, "raw buffer leased");
        Ok(Self {
            module,
            allocation: Some(Allocation {
                ptr,
                len_bytes: size,
            }),
            count,
        })
    }

    /// Lease a buffer sized for `values` and write them into it.
    pub fn from_values(module: &'m mut M, values: &[i32]) -> Result<Self, HostError> {
        let mut buffer = Self::alloc(module, values.len())?;
        buffer.write(values)?;
        Ok(buffer)
    }

    /// Start offset, or null for an empty buffer.
    pub fn ptr(&self) -> Ptr {
        self.allocation.map_or(Ptr::NULL, |a| a.ptr)
    }

    /// Number of integers the buffer holds.
    pub fn len(&self) -> u32 {
        self.count
    }

    /// Whether the buffer holds no integers.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The leased byte region, if anything was allocated.
    pub fn allocation(&self) -> Option<Allocation> {
        self.allocation
    }

    /// A handle to the contents, valid until the module's memory grows.
    pub fn handle(&self) -> Option<BufferHandle> {
        self.allocation
            .map(|a| BufferHandle::for_allocation(a, self.module.memory_epoch()))
    }

    /// Overwrite the buffer with exactly [`len`](Self::len) values.
    pub fn write(&mut self, values: &[i32]) -> Result<(), HostError> {
        let Some(allocation) = self.allocation else {
            if values.is_empty() {
                return Ok(());
            }
            return Err(MemoryError::LengthMismatch {
                expected: 0,
                actual: values.len(),
            }
            .into());
        };
        I32ViewMut::new(self.module.memory_mut(), allocation.ptr, self.count)?
            .copy_from_slice(values)?;
        Ok(())
    }

    /// Decode the buffer's contents.
    pub fn read_back(&self) -> Result<Vec<i32>, HostError> {
        match self.allocation {
            Some(a) => Ok(I32View::new(self.module.memory(), a.ptr, self.count)?.to_vec()),
            None => Ok(Vec::new()),
        }
    }

    /// Ask the module for the wrapping sum of the buffer.
    pub fn sum(&self) -> Result<i32, HostError> {
        match self.allocation {
            Some(a) => Ok(self.module.sum(a.ptr, self.count)?),
            None => Ok(0),
        }
    }

    /// Free the allocation now, reporting any failure.
    pub fn release(mut self) -> Result<(), HostError> {
        if let Some(allocation) = self.allocation.take() {
            self.module.free(allocation.ptr)?;
            debug!(ptr = %allocation.ptr, "raw buffer released");
        }
        Ok(())
    }

    /// Give up the lease without freeing.
    ///
    /// The allocation stays live in the module until someone frees the
    /// returned handle's pointer.
    pub fn leak(mut self) -> Option<BufferHandle> {
        let handle = self.handle();
        self.allocation = None;
        handle
    }
}

impl<M: NumericModule> Drop for RawBuffer<'_, M> {
    fn drop(&mut self) {
        if let Some(allocation) = self.allocation.take() {
            if let Err(e) = self.module.free(allocation.ptr) {
                warn!(ptr = %allocation.ptr, error = %e, "raw buffer free failed on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micro_core::AllocError;
    use micro_module::NativeModule;
    use micro_test_utils::{ramp, tight_module, CountingModule};

    #[test]
    fn one_two_three_sums_to_six() {
        let mut module = NativeModule::default();
        let buffer = RawBuffer::from_values(&mut module, &[1, 2, 3]).unwrap();
        assert_eq!(buffer.len(), 3);
        let handle = buffer.handle().unwrap();
        assert_eq!(handle.ptr(), buffer.ptr());
        assert_eq!(handle.count(), 3);
        assert_eq!(buffer.allocation().unwrap().len_bytes, 12);
        assert_eq!(buffer.sum(), Ok(6));
        assert_eq!(buffer.read_back(), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn empty_buffer_skips_malloc_and_reads() {
        let mut module = CountingModule::new(NativeModule::default());
        {
            let buffer = RawBuffer::from_values(&mut module, &[]).unwrap();
            assert!(buffer.is_empty());
            assert!(buffer.ptr().is_null());
            assert_eq!(buffer.sum(), Ok(0));
            assert_eq!(buffer.read_back(), Ok(vec![]));
            assert!(buffer.leak().is_none());
        }
        assert_eq!(module.mallocs(), 0);
        assert_eq!(module.frees(), 0);
        assert_eq!(module.sums(), 0);
    }

    #[test]
    fn drop_frees_the_allocation() {
        let mut module = NativeModule::default();
        let ptr = {
            let buffer = RawBuffer::from_values(&mut module, &ramp(8)).unwrap();
            buffer.ptr()
        };
        assert_eq!(module.metrics().live_allocations, 0);
        assert_eq!(module.free(ptr), Err(AllocError::InvalidFree { ptr }));
    }

    #[test]
    fn release_frees_once() {
        let mut module = CountingModule::new(NativeModule::default());
        let buffer = RawBuffer::from_values(&mut module, &[4, 5]).unwrap();
        buffer.release().unwrap();
        assert_eq!(module.frees(), 1);
        assert_eq!(module.metrics().live_allocations, 0);
    }

    #[test]
    fn leak_keeps_the_allocation_live() {
        let mut module = NativeModule::default();
        let handle = RawBuffer::from_values(&mut module, &[9, 9, 9])
            .unwrap()
            .leak()
            .unwrap();
        assert_eq!(module.metrics().live_allocations, 1);
        assert_eq!(module.view(&handle).unwrap().to_vec(), vec![9, 9, 9]);
        module.free(handle.ptr()).unwrap();
    }

    #[test]
    fn wrong_value_count_is_rejected() {
        let mut module = NativeModule::default();
        let mut buffer = RawBuffer::alloc(&mut module, 3).unwrap();
        assert_eq!(
            buffer.write(&[1, 2]),
            Err(HostError::Memory(MemoryError::LengthMismatch {
                expected: 3,
                actual: 2
            }))
        );
        drop(buffer);
        let mut empty = RawBuffer::alloc(&mut module, 0).unwrap();
        assert!(empty.write(&[1]).is_err());
    }

    #[test]
    fn oversized_count_is_too_large() {
        let mut module = CountingModule::new(NativeModule::default());
        let count = (u32::MAX / INT_SIZE) as usize + 1;
        assert!(matches!(
            RawBuffer::alloc(&mut module, count),
            Err(HostError::TooLarge { .. })
        ));
        assert_eq!(module.mallocs(), 0);
    }

    #[test]
    fn module_out_of_memory_surfaces_as_alloc_error() {
        let mut module = tight_module();
        let result = RawBuffer::alloc(&mut module, 20_000);
        assert!(matches!(
            result,
            Err(HostError::Alloc(AllocError::OutOfMemory { .. }))
        ));
    }
}
