//! The linear memory region owned by a module instance.
//!
//! A [`LinearMemory`] is a zero-initialised `Vec<u8>` sized in whole
//! pages. It only ever grows. Each growth advances the region's
//! [`MemoryEpoch`] so that cached view descriptions can be checked for
//! staleness in O(1).

use std::ops::Range;

use micro_core::{MemoryEpoch, MemoryError, Ptr};
use tracing::info;

use crate::config::{ModuleConfig, PAGE_SIZE};
use crate::error::ConfigError;

/// Contiguous, byte-addressable, growable memory region.
pub struct LinearMemory {
    /// Backing storage. Length is always a whole number of pages.
    data: Vec<u8>,
    max_pages: u32,
    epoch: MemoryEpoch,
    grow_events: u64,
}

impl LinearMemory {
    /// Create a region of `initial_pages` zeroed pages.
    ///
    /// The caller is responsible for `initial_pages <= max_pages`; use
    /// [`from_config`](Self::from_config) for a validated constructor.
    pub fn new(initial_pages: u32, max_pages: u32) -> Self {
        Self {
            data: vec![0; initial_pages as usize * PAGE_SIZE as usize],
            max_pages,
            epoch: MemoryEpoch(0),
            grow_events: 0,
        }
    }

    /// Create a region from a validated configuration.
    pub fn from_config(config: &ModuleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.initial_pages, config.max_pages))
    }

    /// Grow the region by `delta_pages` zeroed pages.
    ///
    /// Returns the page count before growth. Growing by zero pages is a
    /// successful no-op that does not advance the epoch. Existing bytes
    /// keep their offsets; only the epoch changes.
    pub fn grow(&mut self, delta_pages: u32) -> Result<u32, MemoryError> {
        let old_pages = self.pages();
        if delta_pages == 0 {
            return Ok(old_pages);
        }
        let requested_pages = old_pages as u64 + delta_pages as u64;
        if requested_pages > self.max_pages as u64 {
            return Err(MemoryError::GrowthLimit {
                requested_pages,
                max_pages: self.max_pages,
            });
        }
        self.data
            .resize(requested_pages as usize * PAGE_SIZE as usize, 0);
        self.epoch = self.epoch.next();
        self.grow_events += 1;
        info!(
            old_pages,
            new_pages = requested_pages,
            epoch = self.epoch.0,
            "linear memory grew"
        );
        Ok(old_pages)
    }

    /// Current number of pages.
    pub fn pages(&self) -> u32 {
        (self.data.len() / PAGE_SIZE as usize) as u32
    }

    /// Current size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Configured page limit.
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Current growth epoch.
    pub fn epoch(&self) -> MemoryEpoch {
        self.epoch
    }

    /// Number of successful growths since creation.
    pub fn grow_events(&self) -> u64 {
        self.grow_events
    }

    /// The whole region.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// The whole region, mutably.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bounds-checked shared slice of `len` bytes at `offset`.
    pub fn slice(&self, offset: Ptr, len: u64) -> Result<&[u8], MemoryError> {
        let range = checked_range(self.data.len(), offset, len)?;
        Ok(&self.data[range])
    }

    /// Bounds-checked mutable slice of `len` bytes at `offset`.
    pub fn slice_mut(&mut self, offset: Ptr, len: u64) -> Result<&mut [u8], MemoryError> {
        let range = checked_range(self.data.len(), offset, len)?;
        Ok(&mut self.data[range])
    }

    /// Copy bytes out of the region into `dst`.
    pub fn read(&self, offset: Ptr, dst: &mut [u8]) -> Result<(), MemoryError> {
        dst.copy_from_slice(self.slice(offset, dst.len() as u64)?);
        Ok(())
    }

    /// Copy `src` into the region.
    pub fn write(&mut self, offset: Ptr, src: &[u8]) -> Result<(), MemoryError> {
        self.slice_mut(offset, src.len() as u64)?.copy_from_slice(src);
        Ok(())
    }
}

/// Validate that `[offset, offset + len)` lies inside a region of
/// `memory_size` bytes and return it as an index range.
///
/// Overflow of `offset + len` is reported as out of bounds.
pub fn checked_range(memory_size: usize, offset: Ptr, len: u64) -> Result<Range<usize>, MemoryError> {
    let out_of_bounds = || MemoryError::OutOfBounds {
        offset,
        len,
        memory_size: memory_size as u64,
    };
    let end = (offset.0 as u64).checked_add(len).ok_or_else(out_of_bounds)?;
    if end > memory_size as u64 {
        return Err(out_of_bounds());
    }
    Ok(offset.index()..end as usize)
}
