//! The native numeric module.
//!
//! [`NativeModule`] is one module instance: it owns a [`LinearMemory`]
//! and the [`Allocator`] that carves it up, and exposes the arithmetic
//! entry points through [`NumericModule`]. There is no global instance;
//! every caller constructs (or is handed) its own.

use micro_core::{
    AllocError, Allocation, MemoryEpoch, MemoryError, MemoryMetrics, NumericModule, Ptr,
};
use micro_memory::{
    Allocator, BufferHandle, ConfigError, I32View, I32ViewMut, LinearMemory, ModuleConfig,
};
use tracing::warn;

/// A numeric module instance with its own linear memory.
pub struct NativeModule {
    config: ModuleConfig,
    memory: LinearMemory,
    allocator: Allocator,
}

impl NativeModule {
    /// Create a module from a configuration, validating it first.
    pub fn new(config: ModuleConfig) -> Result<Self, ConfigError> {
        let memory = LinearMemory::from_config(&config)?;
        let allocator = Allocator::new(config.heap_base);
        Ok(Self {
            config,
            memory,
            allocator,
        })
    }

    /// The configuration this module was built with.
    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// The underlying memory region.
    pub fn linear_memory(&self) -> &LinearMemory {
        &self.memory
    }

    /// Grow the memory by `delta_pages`, returning the previous page count.
    ///
    /// Every [`BufferHandle`] minted before a successful growth becomes
    /// stale.
    pub fn grow(&mut self, delta_pages: u32) -> Result<u32, MemoryError> {
        self.memory.grow(delta_pages)
    }

    /// The live allocation starting at `ptr`, if any.
    pub fn allocation(&self, ptr: Ptr) -> Option<Allocation> {
        self.allocator.allocation(ptr)
    }

    /// All live allocations in allocation order.
    pub fn live_allocations(&self) -> Vec<Allocation> {
        self.allocator.live_allocations().collect()
    }

    /// Mint a handle for `allocation` in the current epoch.
    pub fn buffer_handle(&self, allocation: Allocation) -> BufferHandle {
        BufferHandle::for_allocation(allocation, self.memory.epoch())
    }

    /// Resolve a handle against the current memory.
    pub fn view(&self, handle: &BufferHandle) -> Result<I32View<'_>, MemoryError> {
        handle.resolve(self.memory.bytes(), self.memory.epoch())
    }

    /// Resolve a handle against the current memory, mutably.
    pub fn view_mut(&mut self, handle: &BufferHandle) -> Result<I32ViewMut<'_>, MemoryError> {
        let epoch = self.memory.epoch();
        handle.resolve_mut(self.memory.bytes_mut(), epoch)
    }
}

impl Default for NativeModule {
    fn default() -> Self {
        let config = ModuleConfig::default();
        Self {
            memory: LinearMemory::new(config.initial_pages, config.max_pages),
            allocator: Allocator::new(config.heap_base),
            config,
        }
    }
}

impl NumericModule for NativeModule {
    fn add(&self, a: i32, b: i32) -> i32 {
        a.wrapping_add(b)
    }

    fn sum(&self, ptr: Ptr, len: u32) -> Result<i32, MemoryError> {
        if len == 0 {
            return Ok(0);
        }
        match I32View::new(self.memory.bytes(), ptr, len) {
            Ok(view) => Ok(view.wrapping_sum()),
            Err(e) => {
                warn!(%ptr, len, error = %e, "sum rejected");
                Err(e)
            }
        }
    }

    fn malloc(&mut self, size: u32) -> Result<Ptr, AllocError> {
        self.allocator
            .alloc(size, &mut self.memory)
            .map(|allocation| allocation.ptr)
    }

    fn free(&mut self, ptr: Ptr) -> Result<(), AllocError> {
        self.allocator.free(ptr).map(|_| ())
    }

    fn memory(&self) -> &[u8] {
        self.memory.bytes()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.bytes_mut()
    }

    fn memory_epoch(&self) -> MemoryEpoch {
        self.memory.epoch()
    }

    fn metrics(&self) -> MemoryMetrics {
        MemoryMetrics {
            pages: self.memory.pages(),
            memory_bytes: self.memory.size(),
            live_allocations: self.allocator.live_count(),
            bytes_in_use: self.allocator.bytes_in_use(),
            free_ranges: self.allocator.free_ranges(),
            heap_top: self.allocator.heap_top(),
            grow_events: self.memory.grow_events(),
            malloc_count: self.allocator.malloc_count(),
            free_count: self.allocator.free_count(),
            reuse_hits: self.allocator.reuse_hits(),
        }
    }
}
