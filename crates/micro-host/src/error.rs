//! Errors surfaced to host callers.

use std::error::Error;
use std::fmt;
use std::io;

use micro_core::{AllocError, MemoryError};

/// Errors from calling into a module through the host API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The module could not satisfy an allocation or free.
    Alloc(AllocError),
    /// A read, write, or view fell outside the module's memory.
    Memory(MemoryError),
    /// `count * 4` bytes does not fit the module's 32-bit address space.
    TooLarge {
        /// Number of integers requested.
        count: usize,
    },
    /// Writing to the console sink failed.
    Io(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(e) => write!(f, "allocation failed: {e}"),
            Self::Memory(e) => write!(f, "memory access failed: {e}"),
            Self::TooLarge { count } => {
                write!(f, "{count} integers exceed the 32-bit module address space")
            }
            Self::Io(reason) => write!(f, "console write failed: {reason}"),
        }
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(e) => Some(e),
            Self::Memory(e) => Some(e),
            Self::TooLarge { .. } | Self::Io(_) => None,
        }
    }
}

impl From<AllocError> for HostError {
    fn from(e: AllocError) -> Self {
        Self::Alloc(e)
    }
}

impl From<MemoryError> for HostError {
    fn from(e: MemoryError) -> Self {
        Self::Memory(e)
    }
}

impl From<io::Error> for HostError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micro_core::Ptr;

    #[test]
    fn conversions_keep_the_cause() {
        let e: HostError = AllocError::InvalidFree { ptr: Ptr(16) }.into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("0x10"));

        let e: HostError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert_eq!(e, HostError::Io("gone".into()));
        assert!(e.source().is_none());
    }

    #[test]
    fn too_large_names_the_count() {
        let e = HostError::TooLarge { count: 1 << 31 };
        assert!(e.to_string().contains("2147483648"));
    }
}
