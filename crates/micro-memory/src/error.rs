//! Configuration errors for module memory.

use std::error::Error;
use std::fmt;

/// Errors detected by [`ModuleConfig::validate()`](crate::ModuleConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `initial_pages` is zero.
    ZeroInitialPages,
    /// `initial_pages` is larger than `max_pages`.
    InitialExceedsMax {
        /// Configured initial page count.
        initial_pages: u32,
        /// Configured page limit.
        max_pages: u32,
    },
    /// `max_pages` exceeds what 32-bit offsets can address.
    MaxPagesTooLarge {
        /// The configured limit.
        configured: u32,
    },
    /// `heap_base` is zero or not a multiple of the allocation alignment.
    MisalignedHeapBase {
        /// The configured heap base.
        heap_base: u32,
    },
    /// `heap_base` lies at or beyond the end of the initial memory.
    HeapBaseOutsideMemory {
        /// The configured heap base.
        heap_base: u32,
        /// Size of the initial memory in bytes.
        initial_bytes: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInitialPages => write!(f, "initial_pages must be at least 1"),
            Self::InitialExceedsMax {
                initial_pages,
                max_pages,
            } => write!(
                f,
                "initial_pages {initial_pages} exceeds max_pages {max_pages}"
            ),
            Self::MaxPagesTooLarge { configured } => write!(
                f,
                "max_pages {configured} exceeds the 32-bit addressable limit of {} pages",
                crate::config::MAX_ADDRESSABLE_PAGES
            ),
            Self::MisalignedHeapBase { heap_base } => write!(
                f,
                "heap_base {heap_base} must be a non-zero multiple of {}",
                crate::config::ALLOC_ALIGN
            ),
            Self::HeapBaseOutsideMemory {
                heap_base,
                initial_bytes,
            } => write!(
                f,
                "heap_base {heap_base} lies outside the initial {initial_bytes} bytes"
            ),
        }
    }
}

impl Error for ConfigError {}
