//! Low-level backing storage for [`GrowableBuffer`](crate::GrowableBuffer).
//!
//! [`RawStorage`] owns a block of `MaybeUninit<T>` slots together with the
//! length of its initialised prefix. Only that prefix is ever handed out as
//! `&[T]`. The spare tail past the prefix is either left uninitialised or
//! zero-filled, chosen per relocation via [`Tail`].
//!
//! This is the only module in the crate allowed to contain `unsafe`. Every
//! block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::mem::{self, MaybeUninit};
use std::ptr;
use std::slice;

use crate::element::Element;
use crate::error::BufferError;

/// What a freshly relocated block holds past the copied prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tail {
    /// Leave the spare slots uninitialised.
    Uninit,
    /// Fill the spare slots with `T::ZERO`.
    Zeroed,
}

/// A fixed-size block of `T` slots with an initialised prefix.
///
/// The block is never resized in place: capacity changes go through
/// [`RawStorage::try_relocate`], which builds a new block and leaves `self`
/// untouched until the caller swaps it in.
pub(crate) struct RawStorage<T> {
    /// `slots.len()` is the capacity. Slots `[0, init)` are initialised.
    slots: Vec<MaybeUninit<T>>,
    init: usize,
}

impl<T: Element> RawStorage<T> {
    /// Empty storage with zero capacity. Does not allocate.
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            init: 0,
        }
    }

    /// Allocate `capacity` zeroed slots with the first `len` counted as
    /// initialised elements. One allocation, like a zeroed relocation.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < len`.
    pub(crate) fn try_zeroed_with_capacity(len: usize, capacity: usize) -> Result<Self, BufferError> {
        assert!(capacity >= len, "capacity {capacity} below length {len}");
        let mut slots = Self::allocate(capacity)?;
        slots.fill(MaybeUninit::new(T::ZERO));
        Ok(Self { slots, init: len })
    }

    /// Allocate a block of exactly `capacity` slots holding a copy of this
    /// storage's initialised prefix.
    ///
    /// `self` is not modified; on error nothing has changed.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is smaller than the initialised prefix.
    pub(crate) fn try_relocate(&self, capacity: usize, tail: Tail) -> Result<Self, BufferError> {
        assert!(
            capacity >= self.init,
            "relocation to {capacity} slots would truncate {} initialised elements",
            self.init
        );
        let mut slots = Self::allocate(capacity)?;
        // `MaybeUninit<T>` is `Copy` for `T: Copy`, so the prefix copy is a plain memcpy.
        slots[..self.init].copy_from_slice(&self.slots[..self.init]);
        if tail == Tail::Zeroed {
            slots[self.init..].fill(MaybeUninit::new(T::ZERO));
        }
        Ok(Self {
            slots,
            init: self.init,
        })
    }

    /// Write `value` into the first spare slot.
    ///
    /// # Panics
    ///
    /// Panics if there is no spare slot.
    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        self.slots[self.init].write(value);
        self.init += 1;
    }

    /// Copy as many of `values` as fit into the spare slots.
    ///
    /// Returns the number of values copied.
    pub(crate) fn extend_within_capacity(&mut self, values: &[T]) -> usize {
        let count = values.len().min(self.slots.len() - self.init);
        // SAFETY: `init + count <= slots.len()`, so the destination range is
        // inside the allocation. `MaybeUninit<T>` has the layout of `T`.
        // `values` is borrowed immutably while `self.slots` is borrowed
        // mutably, so the ranges cannot overlap.
        unsafe {
            let dst = self.slots.as_mut_ptr().add(self.init).cast::<T>();
            ptr::copy_nonoverlapping(values.as_ptr(), dst, count);
        }
        self.init += count;
        count
    }

    /// The initialised prefix.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, init)` were written by `try_zeroed_with_capacity`,
        // `push`, `extend_within_capacity` or copied by `try_relocate`, and
        // `MaybeUninit<T>` is guaranteed to have the same layout as `T`.
        unsafe { slice::from_raw_parts(self.slots.as_ptr().cast::<T>(), self.init) }
    }

    /// The initialised prefix, mutably.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`; the `&mut self` borrow makes the
        // returned slice the only live reference into the block.
        unsafe { slice::from_raw_parts_mut(self.slots.as_mut_ptr().cast::<T>(), self.init) }
    }

    /// Length of the initialised prefix.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.init
    }

    /// Number of slots in the block.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn allocate(capacity: usize) -> Result<Vec<MaybeUninit<T>>, BufferError> {
        let fits = capacity
            .checked_mul(mem::size_of::<T>())
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(BufferError::CapacityOverflow {
                requested: capacity,
            });
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| BufferError::AllocationFailed {
                requested_elements: capacity,
                element_size: mem::size_of::<T>(),
            })?;
        // SAFETY: the reservation above provides room for `capacity` slots,
        // and `MaybeUninit<T>` is valid in any bit pattern, including none.
        unsafe { slots.set_len(capacity) };
        Ok(slots)
    }

    /// The spare tail, assuming it was zero-filled.
    ///
    /// # Safety
    ///
    /// Every slot in `[len, capacity)` must have been initialised, e.g. by a
    /// [`Tail::Zeroed`] relocation.
    #[cfg(test)]
    unsafe fn tail_assume_init(&self) -> &[T] {
        let spare = self.slots.len() - self.init;
        // SAFETY: guaranteed by the caller.
        unsafe { slice::from_raw_parts(self.slots.as_ptr().add(self.init).cast::<T>(), spare) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty_and_unallocated() {
        let raw = RawStorage::<u32>::new();
        assert_eq!(raw.len(), 0);
        assert_eq!(raw.capacity(), 0);
        assert!(raw.as_slice().is_empty());
    }

    #[test]
    fn zeroed_storage_is_fully_initialised() {
        let raw = RawStorage::<f64>::try_zeroed_with_capacity(4, 4).unwrap();
        assert_eq!(raw.len(), 4);
        assert_eq!(raw.capacity(), 4);
        assert_eq!(raw.as_slice(), &[0.0; 4]);
    }

    #[test]
    fn zeroed_with_capacity_zeroes_prefix_and_tail() {
        let raw = RawStorage::<i64>::try_zeroed_with_capacity(2, 5).unwrap();
        assert_eq!(raw.as_slice(), &[0, 0]);
        assert_eq!(raw.capacity(), 5);
        // SAFETY: every slot was zero-filled at allocation.
        let tail = unsafe { raw.tail_assume_init() };
        assert_eq!(tail, &[0; 3]);
    }

    #[test]
    fn push_fills_spare_slots_in_order() {
        let raw = RawStorage::<i16>::new();
        let mut raw = raw.try_relocate(3, Tail::Uninit).unwrap();
        raw.push(-1);
        raw.push(2);
        assert_eq!(raw.as_slice(), &[-1, 2]);
        assert_eq!(raw.capacity(), 3);
    }

    #[test]
    #[should_panic]
    fn push_past_capacity_panics() {
        let mut raw = RawStorage::<u8>::try_zeroed_with_capacity(1, 1).unwrap();
        raw.push(1);
    }

    #[test]
    fn relocate_copies_prefix_and_leaves_source_alone() {
        let mut raw = RawStorage::<u32>::new().try_relocate(2, Tail::Uninit).unwrap();
        raw.push(7);
        raw.push(8);

        let moved = raw.try_relocate(10, Tail::Uninit).unwrap();
        assert_eq!(moved.as_slice(), &[7, 8]);
        assert_eq!(moved.capacity(), 10);
        assert_eq!(raw.as_slice(), &[7, 8]);
        assert_eq!(raw.capacity(), 2);
        assert_ne!(moved.as_slice().as_ptr(), raw.as_slice().as_ptr());
    }

    #[test]
    fn zeroed_relocation_zero_fills_tail() {
        let mut raw = RawStorage::<u64>::new().try_relocate(1, Tail::Uninit).unwrap();
        raw.push(u64::MAX);
        let reserved = raw.try_relocate(6, Tail::Zeroed).unwrap();
        assert_eq!(reserved.as_slice(), &[u64::MAX]);
        // SAFETY: the tail was zero-filled by the relocation above.
        let tail = unsafe { reserved.tail_assume_init() };
        assert_eq!(tail, &[0; 5]);
    }

    #[test]
    #[should_panic(expected = "would truncate")]
    fn relocate_below_prefix_panics() {
        let raw = RawStorage::<u8>::try_zeroed_with_capacity(4, 4).unwrap();
        let _ = raw.try_relocate(3, Tail::Uninit);
    }

    #[test]
    fn extend_within_capacity_stops_at_capacity() {
        let mut raw = RawStorage::<i32>::new().try_relocate(3, Tail::Uninit).unwrap();
        assert_eq!(raw.extend_within_capacity(&[1, 2]), 2);
        assert_eq!(raw.extend_within_capacity(&[3, 4, 5]), 1);
        assert_eq!(raw.extend_within_capacity(&[6]), 0);
        assert_eq!(raw.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn mutable_prefix_writes_are_visible() {
        let mut raw = RawStorage::<f32>::try_zeroed_with_capacity(3, 3).unwrap();
        raw.as_mut_slice()[1] = 2.5;
        assert_eq!(raw.as_slice(), &[0.0, 2.5, 0.0]);
    }

    #[test]
    fn oversized_request_is_overflow_not_abort() {
        let result = RawStorage::<u64>::try_zeroed_with_capacity(0, usize::MAX / 4);
        assert!(matches!(
            result,
            Err(BufferError::CapacityOverflow { .. })
        ));
    }
}
