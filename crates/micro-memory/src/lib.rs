//! Page-granular linear memory and module allocator for micro.
//!
//! Provides the memory side of the host/module buffer contract:
//!
//! ```text
//! LinearMemory (Vec<u8>, whole 64 KiB pages, grow-only, epoch per growth)
//! ├── Allocator (heap_base.., 8-byte aligned, free list + bump top)
//! ├── I32View / I32ViewMut (bounds-checked little-endian i32 views)
//! └── BufferHandle (non-borrowing view description, epoch-checked)
//! ```
//!
//! Offset 0 is never handed out, so it doubles as the null sentinel at
//! the C boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod error;
pub mod handle;
pub mod memory;
pub mod view;

pub use allocator::Allocator;
pub use config::{ModuleConfig, ALLOC_ALIGN, PAGE_SIZE};
pub use error::ConfigError;
pub use handle::BufferHandle;
pub use memory::LinearMemory;
pub use view::{I32View, I32ViewMut};
