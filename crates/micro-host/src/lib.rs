//! Host side of the micro module contract.
//!
//! Two ways to call a [`NumericModule`](micro_core::NumericModule):
//!
//! - [`Bindings`]: the managed path. Integers and slices go in, a scalar
//!   comes out; marshaling into module memory happens behind the call.
//! - [`RawBuffer`]: the raw path. The caller leases an allocation inside
//!   the module's memory, writes encoded integers, and asks the module
//!   to sum them by offset and count. The lease frees on drop.
//!
//! [`scenario::run_demo`] drives both paths and writes the results to a
//! console sink.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bindings;
pub mod error;
pub mod raw;
pub mod scenario;

pub use bindings::Bindings;
pub use error::HostError;
pub use raw::RawBuffer;
pub use scenario::{run_demo, DemoReport, RawRelease};
