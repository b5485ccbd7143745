//! Native numeric module owning a linear memory region.
//!
//! [`NativeModule`] implements [`micro_core::NumericModule`]: wrapping
//! `add`, bounds-checked `sum(pointer, length)` over its own memory,
//! and `malloc`/`free` backed by
//! [`micro_memory::Allocator`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod module;

pub use module::NativeModule;
