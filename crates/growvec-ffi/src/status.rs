//! C-compatible status codes.
//!
//! [`GrowvecStatus`] is a `repr(i32)` enum covering every failure an FFI
//! entry point can report. Buffer errors convert via `From<&BufferError>`.

use growvec_core::BufferError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowvecStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// The allocator refused a storage request.
    AllocationFailed = -2,
    /// Requested capacity is not addressable for the element type.
    CapacityOverflow = -3,
    /// An argument is null, misaligned, or otherwise invalid.
    InvalidArgument = -4,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -5,
    /// DType code does not name a supported element type.
    UnknownDType = -6,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -7,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&BufferError> for GrowvecStatus {
    fn from(e: &BufferError) -> Self {
        match e {
            BufferError::AllocationFailed { .. } => GrowvecStatus::AllocationFailed,
            BufferError::CapacityOverflow { .. } => GrowvecStatus::CapacityOverflow,
        }
    }
}

impl From<Result<(), BufferError>> for GrowvecStatus {
    fn from(r: Result<(), BufferError>) -> Self {
        match r {
            Ok(()) => GrowvecStatus::Ok,
            Err(e) => GrowvecStatus::from(&e),
        }
    }
}
