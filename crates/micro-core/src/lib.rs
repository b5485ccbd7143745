//! Core types and traits for the micro linear-memory module contract.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the module, the host caller, and the C ABI:
//! byte-offset pointers, allocations, memory epochs, error types, the
//! [`NumericModule`] trait, and the [`MemoryMetrics`] snapshot.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod metrics;
pub mod traits;

pub use error::{AllocError, MemoryError};
pub use id::{Allocation, MemoryEpoch, Ptr, INT_SIZE};
pub use metrics::MemoryMetrics;
pub use traits::NumericModule;
