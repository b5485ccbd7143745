//! C-compatible status codes.
//!
//! [`MicroStatus`] is a `repr(i32)` enum: `Ok` is 0 and every error is
//! negative. Conversions from the Rust error types are provided so entry
//! points can report `MicroStatus::from(&e)`.

use micro_core::{AllocError, MemoryError};
use micro_host::HostError;
use micro_memory::ConfigError;

/// C-compatible status code returned by FFI functions.
///
/// Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MicroStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null or otherwise invalid.
    InvalidArgument = -2,
    /// A byte range falls outside the module's memory.
    OutOfBounds = -3,
    /// The module's memory cannot grow to satisfy an allocation.
    OutOfMemory = -4,
    /// A free of a pointer that is not a live allocation.
    InvalidFree = -5,
    /// A buffer description predates the last memory growth.
    StaleHandle = -6,
    /// Memory growth past the configured page limit.
    GrowthLimit = -7,
    /// A write supplied the wrong number of values.
    LengthMismatch = -8,
    /// Configuration validation failed.
    ConfigError = -9,
    /// An element count exceeds the 32-bit module address space.
    TooLarge = -10,
    /// Internal error (e.g. a mutex poisoned by an earlier panic).
    InternalError = -11,
    /// An element index past the end of a typed view.
    IndexOutOfRange = -12,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&MemoryError> for MicroStatus {
    fn from(e: &MemoryError) -> Self {
        match e {
            MemoryError::OutOfBounds { .. } => MicroStatus::OutOfBounds,
            MemoryError::StaleHandle { .. } => MicroStatus::StaleHandle,
            MemoryError::GrowthLimit { .. } => MicroStatus::GrowthLimit,
            MemoryError::LengthMismatch { .. } => MicroStatus::LengthMismatch,
            MemoryError::IndexOutOfRange { .. } => MicroStatus::IndexOutOfRange,
        }
    }
}

impl From<&AllocError> for MicroStatus {
    fn from(e: &AllocError) -> Self {
        match e {
            AllocError::OutOfMemory { .. } => MicroStatus::OutOfMemory,
            AllocError::InvalidFree { .. } => MicroStatus::InvalidFree,
        }
    }
}

impl From<&ConfigError> for MicroStatus {
    fn from(_e: &ConfigError) -> Self {
        MicroStatus::ConfigError
    }
}

impl From<&HostError> for MicroStatus {
    fn from(e: &HostError) -> Self {
        match e {
            HostError::Alloc(e) => MicroStatus::from(e),
            HostError::Memory(e) => MicroStatus::from(e),
            HostError::TooLarge { .. } => MicroStatus::TooLarge,
            HostError::Io(_) => MicroStatus::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micro_core::{MemoryEpoch, Ptr};

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(MicroStatus::Ok as i32, 0);
        assert_eq!(MicroStatus::InvalidHandle as i32, -1);
        assert_eq!(MicroStatus::InvalidArgument as i32, -2);
        assert_eq!(MicroStatus::OutOfBounds as i32, -3);
        assert_eq!(MicroStatus::OutOfMemory as i32, -4);
        assert_eq!(MicroStatus::InvalidFree as i32, -5);
        assert_eq!(MicroStatus::StaleHandle as i32, -6);
        assert_eq!(MicroStatus::GrowthLimit as i32, -7);
        assert_eq!(MicroStatus::LengthMismatch as i32, -8);
        assert_eq!(MicroStatus::ConfigError as i32, -9);
        assert_eq!(MicroStatus::TooLarge as i32, -10);
        assert_eq!(MicroStatus::InternalError as i32, -11);
        assert_eq!(MicroStatus::IndexOutOfRange as i32, -12);
        assert_eq!(MicroStatus::Panicked as i32, -128);
    }

    #[test]
    fn memory_error_to_status() {
        assert_eq!(
            MicroStatus::from(&MemoryError::OutOfBounds {
                offset: Ptr(8),
                len: 4,
                memory_size: 8
            }),
            MicroStatus::OutOfBounds
        );
        assert_eq!(
            MicroStatus::from(&MemoryError::StaleHandle {
                handle_epoch: MemoryEpoch(0),
                current_epoch: MemoryEpoch(1)
            }),
            MicroStatus::StaleHandle
        );
        assert_eq!(
            MicroStatus::from(&MemoryError::IndexOutOfRange { index: 4, len: 4 }),
            MicroStatus::IndexOutOfRange
        );
    }

    #[test]
    fn host_error_unwraps_to_the_cause() {
        assert_eq!(
            MicroStatus::from(&HostError::Alloc(AllocError::InvalidFree { ptr: Ptr(16) })),
            MicroStatus::InvalidFree
        );
        assert_eq!(
            MicroStatus::from(&HostError::TooLarge { count: usize::MAX }),
            MicroStatus::TooLarge
        );
        assert_eq!(
            MicroStatus::from(&ConfigError::ZeroInitialPages),
            MicroStatus::ConfigError
        );
    }
}
