//! Buffer error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while (re)allocating a buffer's backing storage.
///
/// Every variant is reported before the existing storage is touched, so a
/// buffer that returns one of these is still in its prior valid state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not satisfy the request.
    AllocationFailed {
        /// Number of elements requested.
        requested_elements: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },
    /// The requested capacity does not fit in the address space.
    ///
    /// Raised when `capacity * 2 + 1` overflows `usize`, or when the byte
    /// size of the block would exceed `isize::MAX`.
    CapacityOverflow {
        /// Number of elements requested, saturated at `usize::MAX`.
        requested: usize,
    },
}

impl BufferError {
    /// Total number of bytes the failed request asked for, if representable.
    pub fn requested_bytes(&self) -> Option<usize> {
        match self {
            Self::AllocationFailed {
                requested_elements,
                element_size,
            } => requested_elements.checked_mul(*element_size),
            Self::CapacityOverflow { .. } => None,
        }
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed {
                requested_elements,
                element_size,
            } => {
                write!(
                    f,
                    "buffer allocation failed: requested {requested_elements} elements of {element_size} bytes"
                )
            }
            Self::CapacityOverflow { requested } => {
                write!(f, "buffer capacity overflow: requested {requested} elements")
            }
        }
    }
}

impl Error for BufferError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failed_reports_bytes() {
        let err = BufferError::AllocationFailed {
            requested_elements: 10,
            element_size: 8,
        };
        assert_eq!(err.requested_bytes(), Some(80));
        assert_eq!(
            err.to_string(),
            "buffer allocation failed: requested 10 elements of 8 bytes"
        );
    }

    #[test]
    fn overflow_has_no_byte_count() {
        let err = BufferError::CapacityOverflow {
            requested: usize::MAX,
        };
        assert_eq!(err.requested_bytes(), None);
        assert!(err.to_string().contains("capacity overflow"));
    }
}
