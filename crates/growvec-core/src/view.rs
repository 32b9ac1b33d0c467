//! Flat-array descriptors for zero-copy hand-off.

use std::mem;

use crate::element::{DType, Element};

/// A borrowed description of a buffer's valid prefix as a one-dimensional,
/// contiguous, strided array.
///
/// Carries everything a flat-buffer consumer needs to adopt the memory
/// without copying: data pointer, element count, element size, byte
/// stride and dtype. The descriptor borrows the buffer, so the memory it
/// points at cannot be replaced while it is alive.
#[derive(Clone, Copy, Debug)]
pub struct FlatArray<'a, T: Element> {
    data: &'a [T],
    capacity: usize,
}

impl<'a, T: Element> FlatArray<'a, T> {
    pub(crate) fn new(data: &'a [T], capacity: usize) -> Self {
        Self { data, capacity }
    }

    /// The described elements.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Address of the first element.
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element type.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Size of one element in bytes.
    pub fn itemsize(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Distance between consecutive elements in bytes. Always `itemsize()`.
    pub fn stride(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Total size of the described elements in bytes.
    pub fn nbytes(&self) -> usize {
        mem::size_of_val(self.data)
    }

    /// One-dimensional shape, `[len]`.
    pub fn shape(&self) -> [usize; 1] {
        [self.data.len()]
    }

    /// Returns `true` if the owning buffer has no spare capacity, i.e. the
    /// described memory is the whole allocation.
    pub fn is_consolidated(&self) -> bool {
        self.capacity == self.data.len()
    }

    /// Array-interface type string, e.g. `"<f8"` or `"|u1"`.
    ///
    /// Byte order is the target's native order; single-byte types use `'|'`.
    pub fn typestr(&self) -> String {
        let order = if mem::size_of::<T>() == 1 {
            '|'
        } else if cfg!(target_endian = "little") {
            '<'
        } else {
            '>'
        };
        format!("{order}{}{}", T::DTYPE.kind(), mem::size_of::<T>())
    }
}
