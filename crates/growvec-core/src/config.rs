//! Buffer construction parameters.

use crate::buffer::GrowableBuffer;
use crate::element::Element;
use crate::error::BufferError;

/// Parameters for constructing a [`GrowableBuffer`].
///
/// `initial_size` follows the pre-sized construction contract: the buffer
/// starts with that many zeroed, valid elements. `reserve` then raises the
/// capacity (never the length) so a known number of appends can follow
/// without reallocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Number of valid (zeroed) elements after construction.
    ///
    /// Default: 0, i.e. an empty buffer built up by appending.
    pub initial_size: usize,

    /// Capacity to reserve after construction.
    ///
    /// Default: 0. Values at or below `initial_size` have no effect.
    pub reserve: usize,
}

impl BufferConfig {
    /// Default initial size: an empty buffer.
    pub const DEFAULT_INITIAL_SIZE: usize = 0;

    /// Default reserve: none.
    pub const DEFAULT_RESERVE: usize = 0;

    /// Create a config for a buffer pre-sized to `initial_size` elements.
    pub fn new(initial_size: usize) -> Self {
        Self {
            initial_size,
            reserve: Self::DEFAULT_RESERVE,
        }
    }

    /// Set the capacity to reserve after construction.
    pub fn with_reserve(mut self, reserve: usize) -> Self {
        self.reserve = reserve;
        self
    }

    /// Capacity the built buffer will have.
    pub fn capacity(&self) -> usize {
        self.initial_size.max(self.reserve)
    }

    /// Size in bytes of the storage the built buffer will own, or `None`
    /// if it does not fit in `usize`.
    pub fn capacity_bytes<T: Element>(&self) -> Option<usize> {
        self.capacity().checked_mul(std::mem::size_of::<T>())
    }

    /// Check that a buffer of this shape is addressable for element type `T`.
    pub fn validate<T: Element>(&self) -> Result<(), BufferError> {
        match self.capacity_bytes::<T>() {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(BufferError::CapacityOverflow {
                requested: self.capacity(),
            }),
        }
    }

    /// Validate and construct the buffer.
    ///
    /// The storage is allocated once at [`capacity`](Self::capacity), fully
    /// zeroed, so the result is at generation 0 like any fresh buffer.
    pub fn build<T: Element>(&self) -> Result<GrowableBuffer<T>, BufferError> {
        self.validate::<T>()?;
        GrowableBuffer::presized(self.initial_size, self.capacity())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_SIZE)
    }
}
