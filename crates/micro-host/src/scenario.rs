//! The end-to-end demo scenario.
//!
//! Calls `add(1, 3)` and `sum([1, 2, 3])` through the managed
//! [`Bindings`], then the same two operations through the raw path on a
//! second module, and writes each result on its own line.

use std::io::Write;

use micro_core::NumericModule;
use micro_memory::BufferHandle;
use tracing::{debug, info};

use crate::bindings::Bindings;
use crate::error::HostError;
use crate::raw::RawBuffer;

/// Operands for the demo's `add` calls.
pub const DEMO_ADDENDS: (i32, i32) = (1, 3);

/// Values for the demo's `sum` calls.
pub const DEMO_VALUES: [i32; 3] = [1, 2, 3];

/// What happens to the raw-path buffer once it has been summed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RawRelease {
    /// Free it.
    #[default]
    Free,
    /// Leave it allocated and report its handle.
    Leak,
}

/// Results of one demo run, in print order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoReport {
    /// Managed `add(1, 3)`.
    pub managed_add: i32,
    /// Managed `sum([1, 2, 3])`.
    pub managed_sum: i32,
    /// Raw-module `add(1, 3)`.
    pub raw_add: i32,
    /// Raw-path `sum(ptr, 3)`.
    pub raw_sum: i32,
    /// The raw buffer, when [`RawRelease::Leak`] was chosen.
    pub leaked: Option<BufferHandle>,
}

impl DemoReport {
    /// The four printed values.
    pub fn values(&self) -> [i32; 4] {
        [self.managed_add, self.managed_sum, self.raw_add, self.raw_sum]
    }
}

/// Run the four calls and print one result per line to `console`.
pub fn run_demo<M, R, W>(
    managed: &mut Bindings<M>,
    raw: &mut R,
    release: RawRelease,
    console: &mut W,
) -> Result<DemoReport, HostError>
where
    M: NumericModule,
    R: NumericModule,
    W: Write,
{
    let (a, b) = DEMO_ADDENDS;

    let managed_add = managed.add(a, b);
    writeln!(console, "{managed_add}")?;

    let managed_sum = managed.sum(&DEMO_VALUES)?;
    writeln!(console, "{managed_sum}")?;

    let raw_add = raw.add(a, b);
    writeln!(console, "{raw_add}")?;

    let buffer = RawBuffer::from_values(raw, &DEMO_VALUES)?;
    debug!(ptr = %buffer.ptr(), len = buffer.len(), "raw sum");
    let raw_sum = buffer.sum()?;
    let leaked = match release {
        RawRelease::Free => {
            buffer.release()?;
            None
        }
        RawRelease::Leak => buffer.leak(),
    };
    writeln!(console, "{raw_sum}")?;
    console.flush()?;

    info!(managed_add, managed_sum, raw_add, raw_sum, "demo complete");
    Ok(DemoReport {
        managed_add,
        managed_sum,
        raw_add,
        raw_sum,
        leaked,
    })
}
