//! Error types for plinth containers.
//!
//! Only recoverable failures live here. Broken internal invariants are
//! contract violations and go through [`ensure!`](crate::ensure) instead.

use std::fmt;

/// Errors reported by containers and allocation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A checked accessor was given an index past the end.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The number of live elements.
        len: usize,
    },

    /// The requested capacity does not fit in the address space.
    CapacityOverflow,

    /// The allocator could not provide the requested storage.
    AllocationFailed {
        /// Size of the failed request in bytes.
        bytes: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Error::CapacityOverflow => write!(f, "capacity overflow"),
            Error::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {bytes} bytes")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::OutOfRange { index: 5, len: 3 }.to_string(),
            "index 5 out of range for length 3"
        );
        assert_eq!(Error::CapacityOverflow.to_string(), "capacity overflow");
        assert_eq!(
            Error::AllocationFailed { bytes: 64 }.to_string(),
            "failed to allocate 64 bytes"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::CapacityOverflow, Error::CapacityOverflow);
        assert_ne!(
            Error::OutOfRange { index: 1, len: 0 },
            Error::OutOfRange { index: 2, len: 0 }
        );
    }
}
