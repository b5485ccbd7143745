//! Micro: numeric modules that own a linear memory, and the host calls
//! that drive them.
//!
//! Facade over the micro sub-crates. A module exposes `add`, a raw
//! `sum(pointer, length)` over its own memory, and `malloc`/`free`; the
//! host calls it either through managed [`host::Bindings`] or by leasing
//! a [`host::RawBuffer`] and passing offsets.
//!
//! # Quick start
//!
//! ```rust
//! use micro::prelude::*;
//!
//! let mut managed = Bindings::new(NativeModule::default());
//! assert_eq!(managed.add(1, 3), 4);
//! assert_eq!(managed.sum(&[1, 2, 3]).unwrap(), 6);
//!
//! let mut raw = NativeModule::default();
//! let buffer = RawBuffer::from_values(&mut raw, &[1, 2, 3]).unwrap();
//! assert_eq!(buffer.sum().unwrap(), 6);
//! buffer.release().unwrap();
//! assert_eq!(raw.metrics().live_allocations, 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `micro-core` | `Ptr`, `Allocation`, errors, the `NumericModule` trait |
//! | [`memory`] | `micro-memory` | Linear memory, allocator, typed views, buffer handles |
//! | [`module`] | `micro-module` | The native numeric module |
//! | [`host`] | `micro-host` | Managed bindings, raw leases, the demo scenario |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors, and the module trait (`micro-core`).
pub use micro_core as types;

/// Linear memory, allocator, and typed views (`micro-memory`).
pub use micro_memory as memory;

/// The native numeric module (`micro-module`).
pub use micro_module as module;

/// Host-side calling conventions (`micro-host`).
///
/// [`host::Bindings`] for the managed path, [`host::RawBuffer`] for the
/// raw path, [`host::run_demo`] for the four-call scenario.
pub use micro_host as host;

/// Common imports for typical micro usage.
pub mod prelude {
    pub use micro_core::{AllocError, Allocation, MemoryError, NumericModule, Ptr};
    pub use micro_host::{run_demo, Bindings, HostError, RawBuffer, RawRelease};
    pub use micro_memory::{BufferHandle, ModuleConfig};
    pub use micro_module::NativeModule;
}
