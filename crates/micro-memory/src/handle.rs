//! Epoch-scoped buffer handles.
//!
//! A [`BufferHandle`] describes a run of encoded integers without
//! borrowing the memory, so it can be held across calls into the
//! module. It records the [`MemoryEpoch`] it was minted in; resolving
//! it after the memory has grown fails with
//! [`MemoryError::StaleHandle`] instead of silently reading through a
//! description that predates the growth. Re-deriving a handle is an
//! explicit [`refresh`](BufferHandle::refresh).

use std::fmt;

use micro_core::{Allocation, MemoryEpoch, MemoryError, Ptr};

use crate::view::{byte_len, I32View, I32ViewMut};

/// Description of `count` integers at `ptr`, valid in one memory epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct BufferHandle {
    epoch: MemoryEpoch,
    ptr: Ptr,
    count: u32,
}

impl BufferHandle {
    /// Mint a handle for `count` integers at `ptr` in `epoch`.
    pub fn new(epoch: MemoryEpoch, ptr: Ptr, count: u32) -> Self {
        Self { epoch, ptr, count }
    }

    /// Mint a handle covering every whole integer of `allocation`.
    pub fn for_allocation(allocation: Allocation, epoch: MemoryEpoch) -> Self {
        Self::new(epoch, allocation.ptr, allocation.int_capacity())
    }

    /// The epoch this handle was minted in.
    pub fn epoch(&self) -> MemoryEpoch {
        self.epoch
    }

    /// Start offset.
    pub fn ptr(&self) -> Ptr {
        self.ptr
    }

    /// Number of integers described.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The byte region described, for passing back to `free`.
    pub fn allocation(&self) -> Allocation {
        Allocation {
            ptr: self.ptr,
            len_bytes: (byte_len(self.count)).min(u32::MAX as u64) as u32,
        }
    }

    /// Fail if the memory has grown since this handle was minted.
    pub fn check(&self, current: MemoryEpoch) -> Result<(), MemoryError> {
        if self.epoch != current {
            return Err(MemoryError::StaleHandle {
                handle_epoch: self.epoch,
                current_epoch: current,
            });
        }
        Ok(())
    }

    /// Resolve to a read-only view over `memory`.
    pub fn resolve<'a>(
        &self,
        memory: &'a [u8],
        current: MemoryEpoch,
    ) -> Result<I32View<'a>, MemoryError> {
        self.check(current)?;
        I32View::new(memory, self.ptr, self.count)
    }

    /// Resolve to a mutable view over `memory`.
    pub fn resolve_mut<'a>(
        &self,
        memory: &'a mut [u8],
        current: MemoryEpoch,
    ) -> Result<I32ViewMut<'a>, MemoryError> {
        self.check(current)?;
        I32ViewMut::new(memory, self.ptr, self.count)
    }

    /// Re-derive this handle in `current`.
    ///
    /// Offsets survive growth, so the caller may re-mint a handle for an
    /// allocation it knows to be live; this is the only way to do so.
    pub fn refresh(self, current: MemoryEpoch) -> Self {
        Self {
            epoch: current,
            ..self
        }
    }
}

impl fmt::Display for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BufferHandle(epoch={}, ptr={}, count={})",
            self.epoch, self.ptr, self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_its_own_epoch() {
        let mut memory = vec![0u8; 32];
        let h = BufferHandle::new(MemoryEpoch(2), Ptr(8), 3);
        h.resolve_mut(&mut memory, MemoryEpoch(2))
            .unwrap()
            .copy_from_slice(&[4, 5, 6])
            .unwrap();
        let view = h.resolve(&memory, MemoryEpoch(2)).unwrap();
        assert_eq!(view.to_vec(), vec![4, 5, 6]);
    }

    #[test]
    fn stale_epoch_is_rejected() {
        let memory = vec![0u8; 32];
        let h = BufferHandle::new(MemoryEpoch(0), Ptr(8), 3);
        assert_eq!(
            h.resolve(&memory, MemoryEpoch(1)).unwrap_err(),
            MemoryError::StaleHandle {
                handle_epoch: MemoryEpoch(0),
                current_epoch: MemoryEpoch(1),
            }
        );
        let fresh = h.refresh(MemoryEpoch(1));
        assert_eq!(fresh.ptr(), h.ptr());
        assert!(fresh.resolve(&memory, MemoryEpoch(1)).is_ok());
    }

    #[test]
    fn for_allocation_counts_whole_integers() {
        let a = Allocation {
            ptr: Ptr(1024),
            len_bytes: 12,
        };
        let h = BufferHandle::for_allocation(a, MemoryEpoch(0));
        assert_eq!(h.count(), 3);
        assert_eq!(h.allocation(), a);
    }

    #[test]
    fn bounds_still_checked_after_epoch_check() {
        let memory = vec![0u8; 8];
        let h = BufferHandle::new(MemoryEpoch(0), Ptr(4), 2);
        assert!(matches!(
            h.resolve(&memory, MemoryEpoch(0)),
            Err(MemoryError::OutOfBounds { .. })
        ));
    }
}
