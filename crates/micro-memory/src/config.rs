//! Module memory configuration parameters.

use crate::error::ConfigError;

/// Size of one linear memory page in bytes (64 KiB).
pub const PAGE_SIZE: u32 = 65_536;

/// Largest page count addressable with 32-bit offsets.
pub const MAX_ADDRESSABLE_PAGES: u32 = 65_536;

/// Alignment of every allocation, in bytes.
pub const ALLOC_ALIGN: u32 = 8;

/// Configuration for a module's linear memory and allocator.
///
/// Validated at module construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Pages allocated when the module is created.
    ///
    /// Default: 1 (64 KiB). Must be at least 1.
    pub initial_pages: u32,

    /// Upper bound on the number of pages the region may grow to.
    ///
    /// Default: 256 (16 MiB). At most [`MAX_ADDRESSABLE_PAGES`].
    pub max_pages: u32,

    /// First offset the allocator may hand out.
    ///
    /// Bytes below this offset are reserved (offset 0 is the null
    /// sentinel). Default: 1024. Must be a non-zero multiple of
    /// [`ALLOC_ALIGN`] and lie inside the initial pages.
    pub heap_base: u32,
}

impl ModuleConfig {
    /// Default initial page count.
    pub const DEFAULT_INITIAL_PAGES: u32 = 1;

    /// Default page limit.
    pub const DEFAULT_MAX_PAGES: u32 = 256;

    /// Default heap base offset.
    pub const DEFAULT_HEAP_BASE: u32 = 1024;

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_pages == 0 {
            return Err(ConfigError::ZeroInitialPages);
        }
        if self.max_pages > MAX_ADDRESSABLE_PAGES {
            return Err(ConfigError::MaxPagesTooLarge {
                configured: self.max_pages,
            });
        }
        if self.initial_pages > self.max_pages {
            return Err(ConfigError::InitialExceedsMax {
                initial_pages: self.initial_pages,
                max_pages: self.max_pages,
            });
        }
        if self.heap_base == 0 || self.heap_base % ALLOC_ALIGN != 0 {
            return Err(ConfigError::MisalignedHeapBase {
                heap_base: self.heap_base,
            });
        }
        if self.heap_base as u64 >= self.initial_bytes() {
            return Err(ConfigError::HeapBaseOutsideMemory {
                heap_base: self.heap_base,
                initial_bytes: self.initial_bytes(),
            });
        }
        Ok(())
    }

    /// Size of the region at creation, in bytes.
    pub fn initial_bytes(&self) -> u64 {
        self.initial_pages as u64 * PAGE_SIZE as u64
    }

    /// Largest size the region may reach, in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_pages as u64 * PAGE_SIZE as u64
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            initial_pages: Self::DEFAULT_INITIAL_PAGES,
            max_pages: Self::DEFAULT_MAX_PAGES,
            heap_base: Self::DEFAULT_HEAP_BASE,
        }
    }
}
