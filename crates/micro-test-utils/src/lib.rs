//! Test utilities and fixtures for micro development.
//!
//! Provides a call-counting wrapper around any [`NumericModule`]
//! ([`CountingModule`]), a console sink that records what it was given
//! ([`RecordingConsole`]), and small module and value-sequence fixtures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;
use std::io;

use micro_core::{AllocError, MemoryEpoch, MemoryError, MemoryMetrics, NumericModule, Ptr};

pub use fixtures::{alternating_extremes, ramp, small_module, tight_module};

/// Wraps a module and counts the calls made through it.
///
/// `sum` takes `&self`, so its counters use [`Cell`].
pub struct CountingModule<M> {
    inner: M,
    mallocs: u64,
    frees: u64,
    sums: Cell<u64>,
    elements_read: Cell<u64>,
}

impl<M: NumericModule> CountingModule<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            mallocs: 0,
            frees: 0,
            sums: Cell::new(0),
            elements_read: Cell::new(0),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }

    /// Number of `malloc` calls, successful or not.
    pub fn mallocs(&self) -> u64 {
        self.mallocs
    }

    /// Number of `free` calls, successful or not.
    pub fn frees(&self) -> u64 {
        self.frees
    }

    /// Number of `sum` calls.
    pub fn sums(&self) -> u64 {
        self.sums.get()
    }

    /// Total `len` passed to `sum` calls that succeeded.
    pub fn elements_read(&self) -> u64 {
        self.elements_read.get()
    }
}

impl<M: NumericModule> NumericModule for CountingModule<M> {
    fn add(&self, a: i32, b: i32) -> i32 {
        self.inner.add(a, b)
    }

    fn sum(&self, ptr: Ptr, len: u32) -> Result<i32, MemoryError> {
        self.sums.set(self.sums.get() + 1);
        let result = self.inner.sum(ptr, len);
        if result.is_ok() {
            self.elements_read.set(self.elements_read.get() + len as u64);
        }
        result
    }

    fn malloc(&mut self, size: u32) -> Result<Ptr, AllocError> {
        self.mallocs += 1;
        self.inner.malloc(size)
    }

    fn free(&mut self, ptr: Ptr) -> Result<(), AllocError> {
        self.frees += 1;
        self.inner.free(ptr)
    }

    fn memory(&self) -> &[u8] {
        self.inner.memory()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.inner.memory_mut()
    }

    fn memory_epoch(&self) -> MemoryEpoch {
        self.inner.memory_epoch()
    }

    fn metrics(&self) -> MemoryMetrics {
        self.inner.metrics()
    }
}

/// An `io::Write` sink that keeps everything written to it.
#[derive(Default)]
pub struct RecordingConsole {
    bytes: Vec<u8>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Written text split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }
}

impl io::Write for RecordingConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink whose every write fails.
pub struct BrokenConsole;

impl io::Write for BrokenConsole {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
    }
}
