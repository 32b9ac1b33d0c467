//! The growable buffer and its capacity policy.
//!
//! A [`GrowableBuffer`] owns one contiguous block of `T` and tracks how much
//! of it is logically valid. Capacity only changes by replacing the block:
//!
//! - [`append`](GrowableBuffer::append) grows a full buffer to
//!   `capacity * 2 + 1`, leaving the new spare slots uninitialised.
//! - [`reserve`](GrowableBuffer::reserve) grows to an exact capacity and
//!   zero-fills the spare slots.
//! - [`consolidate`](GrowableBuffer::consolidate) shrinks to exactly the
//!   logical length.
//!
//! Each replacement bumps the buffer's [`generation`](GrowableBuffer::generation).

use std::fmt;

use log::{debug, trace};

use crate::element::{DType, Element};
use crate::error::BufferError;
use crate::raw::{RawStorage, Tail};
use crate::view::FlatArray;

/// Capacity an append-triggered growth moves to from `capacity`.
///
/// `capacity * 2 + 1`: strictly increasing even from zero, and doubling
/// keeps the total copy cost of `N` appends at `O(N)`. Returns `None` on
/// overflow.
pub const fn grown_capacity(capacity: usize) -> Option<usize> {
    match capacity.checked_mul(2) {
        Some(doubled) => doubled.checked_add(1),
        None => None,
    }
}

/// A dynamically sized array over a single contiguous allocation.
///
/// Length and capacity are tracked separately. Only the first
/// [`size`](Self::size) elements are reachable through [`view`](Self::view);
/// the spare tail is never observable.
///
/// Construction is pre-sized: `GrowableBuffer::new(n)` has `size() == n`
/// with every element zero, ready to be filled by index. Build from empty
/// with `new(0)` (or [`empty`](Self::empty)) and [`append`](Self::append).
///
/// ```
/// use growvec_core::GrowableBuffer;
///
/// let mut buf = GrowableBuffer::<i32>::new(0)?;
/// buf.append(5)?;
/// buf.append(7)?;
/// buf.append(9)?;
/// assert_eq!(buf.view(), &[5, 7, 9]);
/// assert_eq!(buf.capacity(), 3);
/// # Ok::<(), growvec_core::BufferError>(())
/// ```
pub struct GrowableBuffer<T: Element> {
    storage: RawStorage<T>,
    generation: u64,
}

impl<T: Element> GrowableBuffer<T> {
    /// Allocate a buffer of `size` zeroed elements with capacity `size`.
    ///
    /// The buffer is not empty afterwards: `size()` returns `size`.
    pub fn new(size: usize) -> Result<Self, BufferError> {
        Self::presized(size, size)
    }

    /// Pre-sized buffer of `size` zeroed elements in one allocation of
    /// `capacity` zeroed slots, at generation 0.
    pub(crate) fn presized(size: usize, capacity: usize) -> Result<Self, BufferError> {
        let storage = RawStorage::try_zeroed_with_capacity(size, capacity).inspect_err(|e| {
            debug!("{} buffer construction failed: {e}", T::DTYPE);
        })?;
        Ok(Self {
            storage,
            generation: 0,
        })
    }

    /// An empty buffer with zero capacity. Does not allocate.
    pub const fn empty() -> Self {
        Self {
            storage: RawStorage::new(),
            generation: 0,
        }
    }

    /// Build a consolidated buffer holding a copy of `values`.
    pub fn from_slice(values: &[T]) -> Result<Self, BufferError> {
        let mut buf = Self::empty();
        buf.reserve(values.len())?;
        buf.extend_from_slice(values)?;
        buf.generation = 0;
        Ok(buf)
    }

    /// Number of logically valid elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    /// Alias of [`size`](Self::size).
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the buffer holds no valid elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    /// Number of elements the backing storage can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Number of appends possible before the next reallocation.
    #[inline]
    pub fn spare_capacity(&self) -> usize {
        self.storage.capacity() - self.storage.len()
    }

    /// How many times the backing storage has been replaced.
    ///
    /// A raw pointer taken from [`as_ptr`](Self::as_ptr) stays valid
    /// exactly as long as this value is unchanged.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Element type of this buffer.
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Size of the backing storage in bytes (capacity, not length).
    pub fn memory_bytes(&self) -> usize {
        self.storage.capacity() * std::mem::size_of::<T>()
    }

    /// Window onto the valid prefix `[0, size())`.
    #[inline]
    pub fn view(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Mutable window onto the valid prefix `[0, size())`.
    #[inline]
    pub fn view_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Pointer to the first valid element.
    ///
    /// Dangling but non-null when capacity is zero.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_slice().as_ptr()
    }

    /// Mutable pointer to the first valid element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_slice().as_mut_ptr()
    }

    /// Describe the valid prefix as a flat, strided array for zero-copy
    /// hand-off.
    pub fn describe(&self) -> FlatArray<'_, T> {
        FlatArray::new(self.storage.as_slice(), self.capacity())
    }

    /// Append `value` at index `size()`.
    ///
    /// When the buffer is full the storage is first replaced by one of
    /// capacity `capacity * 2 + 1`. On error the buffer is unchanged.
    #[inline]
    pub fn append(&mut self, value: T) -> Result<(), BufferError> {
        if self.storage.len() == self.storage.capacity() {
            self.grow()?;
        }
        self.storage.push(value);
        Ok(())
    }

    /// Append every element of `values`, in order.
    ///
    /// Capacity evolves exactly as it would under one `append` per element.
    /// If a growth step fails, the elements copied before it remain.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), BufferError> {
        let mut rest = values;
        loop {
            let copied = self.storage.extend_within_capacity(rest);
            rest = &rest[copied..];
            if rest.is_empty() {
                return Ok(());
            }
            self.grow()?;
        }
    }

    /// Ensure capacity for at least `capacity` elements in total.
    ///
    /// A no-op when `capacity <= self.capacity()`; reserve never shrinks.
    /// Otherwise the storage is replaced by one of exactly `capacity`
    /// elements, the valid prefix is copied, and the slots
    /// `[size(), capacity)` are zero-filled. The next `capacity - size()`
    /// appends will not reallocate.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), BufferError> {
        if capacity <= self.storage.capacity() {
            return Ok(());
        }
        self.replace_storage(capacity, Tail::Zeroed)
    }

    /// Shrink the backing storage to exactly `size()` elements.
    ///
    /// A no-op if the buffer is already consolidated.
    pub fn consolidate(&mut self) -> Result<(), BufferError> {
        let len = self.storage.len();
        if len == self.storage.capacity() {
            return Ok(());
        }
        self.replace_storage(len, Tail::Uninit)
    }

    /// Returns `true` if capacity equals length.
    pub fn is_consolidated(&self) -> bool {
        self.storage.len() == self.storage.capacity()
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self) -> Result<(), BufferError> {
        let capacity = self.storage.capacity();
        let grown = grown_capacity(capacity).ok_or(BufferError::CapacityOverflow {
            requested: usize::MAX,
        })?;
        self.replace_storage(grown, Tail::Uninit)
    }

    fn replace_storage(&mut self, capacity: usize, tail: Tail) -> Result<(), BufferError> {
        let replacement = self
            .storage
            .try_relocate(capacity, tail)
            .inspect_err(|e| {
                debug!(
                    "{} buffer relocation {} -> {capacity} failed: {e}",
                    T::DTYPE,
                    self.storage.capacity()
                );
            })?;
        trace!(
            "{} buffer storage replaced: len {} capacity {} -> {capacity} ({tail:?} tail), generation {}",
            T::DTYPE,
            self.storage.len(),
            self.storage.capacity(),
            self.generation + 1
        );
        self.storage = replacement;
        self.generation += 1;
        Ok(())
    }
}

impl<T: Element> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Element> fmt::Debug for GrowableBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableBuffer")
            .field("dtype", &T::DTYPE)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("generation", &self.generation)
            .field("data", &self.view())
            .finish()
    }
}

impl<T: Element> PartialEq for GrowableBuffer<T> {
    /// Buffers compare by their valid prefix only.
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl<T: Element> AsRef<[T]> for GrowableBuffer<T> {
    fn as_ref(&self) -> &[T] {
        self.view()
    }
}

impl<T: Element> AsMut<[T]> for GrowableBuffer<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.view_mut()
    }
}

impl<'a, T: Element> IntoIterator for &'a GrowableBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.view().iter()
    }
}

impl<T: Element> TryFrom<&[T]> for GrowableBuffer<T> {
    type Error = BufferError;

    fn try_from(values: &[T]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;
    use proptest::prelude::*;

    #[test]
    fn grown_capacity_sequence() {
        assert_eq!(grown_capacity(0), Some(1));
        assert_eq!(grown_capacity(1), Some(3));
        assert_eq!(grown_capacity(3), Some(7));
        assert_eq!(grown_capacity(7), Some(15));
        assert_eq!(grown_capacity(usize::MAX / 2), Some(usize::MAX));
        assert_eq!(grown_capacity(usize::MAX / 2 + 1), None);
    }

    #[test]
    fn append_three_from_empty() {
        let mut buf = GrowableBuffer::<i64>::new(0).unwrap();
        buf.append(5).unwrap();
        buf.append(7).unwrap();
        buf.append(9).unwrap();
        assert_eq!(buf.size(), 3);
        assert_eq!(buf.view(), &[5, 7, 9]);
    }

    #[test]
    fn construction_is_presized_not_empty() {
        let mut buf = GrowableBuffer::<u16>::new(3).unwrap();
        assert_eq!(buf.size(), 3);
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.view(), &[0, 0, 0]);

        buf.view_mut().copy_from_slice(&[10, 20, 30]);
        buf.append(4).unwrap();
        assert_eq!(buf.view(), &[10, 20, 30, 4]);
        assert_eq!(buf.size(), 4);
        assert_eq!(buf.capacity(), 7);
    }

    #[test]
    fn reserve_then_append_does_not_reallocate() {
        let mut buf = GrowableBuffer::<f32>::new(0).unwrap();
        buf.reserve(10).unwrap();
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.capacity(), 10);
        let generation = buf.generation();
        let ptr = buf.as_ptr();

        for i in 0..10 {
            buf.append(i as f32).unwrap();
        }
        assert_eq!(buf.generation(), generation);
        assert_eq!(buf.as_ptr(), ptr);
        assert_eq!(buf.size(), 10);
    }

    #[test]
    fn reserve_never_shrinks() {
        let mut buf = GrowableBuffer::<u8>::new(4).unwrap();
        buf.reserve(2).unwrap();
        buf.reserve(4).unwrap();
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.generation(), 0);
    }

    #[test]
    fn reserve_keeps_prefix_and_opens_spare_capacity() {
        let mut buf = GrowableBuffer::<i32>::new(0).unwrap();
        buf.append(-1).unwrap();
        buf.reserve(8).unwrap();
        assert_eq!(buf.view(), &[-1]);
        assert_eq!(buf.spare_capacity(), 7);
    }

    #[test]
    fn consolidate_trims_to_length() {
        let mut buf = GrowableBuffer::<u32>::new(0).unwrap();
        for v in 1..=5 {
            buf.append(v).unwrap();
        }
        assert_eq!(buf.capacity(), 7);
        buf.consolidate().unwrap();
        assert_eq!(buf.capacity(), 5);
        assert!(buf.is_consolidated());
        assert_eq!(buf.view(), &[1, 2, 3, 4, 5]);

        let generation = buf.generation();
        buf.consolidate().unwrap();
        assert_eq!(buf.generation(), generation);
        assert_eq!(buf.capacity(), 5);
    }

    #[test]
    fn consolidate_empty_releases_storage() {
        let mut buf = GrowableBuffer::<f64>::new(0).unwrap();
        buf.reserve(16).unwrap();
        buf.consolidate().unwrap();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.memory_bytes(), 0);
        buf.append(1.0).unwrap();
        assert_eq!(buf.capacity(), 1);
    }

    #[test]
    fn append_after_consolidate_grows_from_length() {
        let mut buf = GrowableBuffer::<u8>::from_slice(&[1, 2, 3, 4]).unwrap();
        assert_eq!(buf.capacity(), 4);
        buf.append(5).unwrap();
        assert_eq!(buf.capacity(), 9);
    }

    #[test]
    fn extend_matches_repeated_append() {
        let values: Vec<u64> = (0..100).collect();

        let mut looped = GrowableBuffer::<u64>::new(2).unwrap();
        for &v in &values {
            looped.append(v).unwrap();
        }

        let mut extended = GrowableBuffer::<u64>::new(2).unwrap();
        extended.extend_from_slice(&values).unwrap();

        assert_eq!(extended.view(), looped.view());
        assert_eq!(extended.capacity(), looped.capacity());
        assert_eq!(extended.generation(), looped.generation());
    }

    #[test]
    fn extend_with_empty_slice_is_noop() {
        let mut buf = GrowableBuffer::<i8>::empty();
        buf.extend_from_slice(&[]).unwrap();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.generation(), 0);
    }

    #[test]
    fn failed_reserve_leaves_buffer_intact() {
        let mut buf = GrowableBuffer::<u64>::new(0).unwrap();
        buf.extend_from_slice(&[3, 1, 4]).unwrap();
        let capacity = buf.capacity();
        let generation = buf.generation();

        let err = buf.reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, BufferError::CapacityOverflow { .. }));
        assert_eq!(buf.view(), &[3, 1, 4]);
        assert_eq!(buf.capacity(), capacity);
        assert_eq!(buf.generation(), generation);
    }

    #[test]
    fn refused_allocation_leaves_buffer_intact() {
        let mut buf = GrowableBuffer::<u64>::from_slice(&[1, 2, 3]).unwrap();
        let capacity = buf.capacity();
        let generation = buf.generation();

        // Addressable, so it reaches the allocator, which cannot satisfy it.
        let err = buf.reserve(isize::MAX as usize / 8).unwrap_err();
        assert!(
            matches!(err, BufferError::AllocationFailed { element_size: 8, .. }),
            "{err:?}"
        );
        assert_eq!(buf.view(), &[1, 2, 3]);
        assert_eq!(buf.capacity(), capacity);
        assert_eq!(buf.generation(), generation);

        buf.append(4).unwrap();
        assert_eq!(buf.view(), &[1, 2, 3, 4]);
    }

    #[test]
    fn view_is_read_write() {
        let mut buf = GrowableBuffer::<Complex<f64>>::new(2).unwrap();
        buf.view_mut()[1] = Complex::new(1.0, -1.0);
        assert_eq!(buf.view()[1].im, -1.0);
        assert_eq!(buf.view()[0], Complex::new(0.0, 0.0));
    }

    #[test]
    fn debug_shows_bookkeeping() {
        let buf = GrowableBuffer::<u8>::from_slice(&[1]).unwrap();
        let s = format!("{buf:?}");
        assert!(s.contains("len: 1"));
        assert!(s.contains("capacity: 1"));
        assert!(s.contains("U8"));
    }

    #[test]
    fn buffers_compare_by_prefix_only() {
        let mut a = GrowableBuffer::<i32>::from_slice(&[1, 2]).unwrap();
        let mut b = GrowableBuffer::<i32>::empty();
        b.append(1).unwrap();
        b.append(2).unwrap();
        assert_ne!(a.capacity(), b.capacity());
        assert_eq!(a, b);
        a.append(3).unwrap();
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn appends_preserve_order(values in prop::collection::vec(any::<i32>(), 0..300)) {
            let mut buf = GrowableBuffer::<i32>::new(0).unwrap();
            for &v in &values {
                buf.append(v).unwrap();
            }
            prop_assert_eq!(buf.size(), values.len());
            prop_assert_eq!(buf.view(), values.as_slice());
        }

        #[test]
        fn reallocations_are_logarithmic(n in 0usize..5000) {
            let mut buf = GrowableBuffer::<u8>::new(0).unwrap();
            for i in 0..n {
                buf.append(i as u8).unwrap();
            }
            // Capacity after k growths from zero is 2^k - 1.
            let expected = usize::BITS - n.leading_zeros();
            prop_assert_eq!(buf.generation(), u64::from(expected));
        }

        #[test]
        fn reserve_never_changes_contents(
            values in prop::collection::vec(any::<u16>(), 0..64),
            requests in prop::collection::vec(0usize..128, 1..8),
        ) {
            let mut buf = GrowableBuffer::<u16>::from_slice(&values).unwrap();
            for n in requests {
                buf.reserve(n).unwrap();
                prop_assert_eq!(buf.size(), values.len());
                prop_assert_eq!(buf.view(), values.as_slice());
                prop_assert!(buf.capacity() >= n);
            }
        }

        #[test]
        fn growth_keeps_prefix(
            initial in prop::collection::vec(any::<f64>().prop_filter("nan", |v| !v.is_nan()), 0..40),
            extra in 1usize..40,
        ) {
            let mut buf = GrowableBuffer::<f64>::from_slice(&initial).unwrap();
            for i in 0..extra {
                buf.append(i as f64).unwrap();
                prop_assert_eq!(&buf.view()[..initial.len()], initial.as_slice());
            }
        }
    }
}
