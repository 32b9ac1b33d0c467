//! Test utilities and reference models for growvec development.
//!
//! Provides a [`ModelBuffer`] that tracks the expected length, capacity and
//! generation of a [`GrowableBuffer`] using plain arithmetic and a `Vec`,
//! [`BufferOp`] sequences with proptest strategies for model-based tests,
//! and the [`Sample`] trait for deterministic per-dtype test data.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use growvec_core::{BufferError, Complex, Element, GrowableBuffer};
use proptest::prelude::*;

/// Reference model of a buffer's observable state.
///
/// Mirrors the capacity policy independently of the real implementation:
/// growth to `capacity * 2 + 1` on a full append, exact growth on reserve,
/// exact shrink on consolidate, one generation per storage replacement.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelBuffer<T> {
    pub values: Vec<T>,
    pub capacity: usize,
    pub generation: u64,
}

impl<T: Element> ModelBuffer<T> {
    /// Model of `GrowableBuffer::new(size)`.
    pub fn new(size: usize) -> Self {
        Self {
            values: vec![T::ZERO; size],
            capacity: size,
            generation: 0,
        }
    }

    pub fn append(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.capacity = self.capacity * 2 + 1;
            self.generation += 1;
        }
        self.values.push(value);
    }

    pub fn extend(&mut self, values: &[T]) {
        for &v in values {
            self.append(v);
        }
    }

    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.capacity = capacity;
            self.generation += 1;
        }
    }

    pub fn consolidate(&mut self) {
        if self.values.len() < self.capacity {
            self.capacity = self.values.len();
            self.generation += 1;
        }
    }

    /// Overwrite the element at `index % len`; no-op when empty.
    pub fn write(&mut self, index: usize, value: T) {
        if !self.values.is_empty() {
            let i = index % self.values.len();
            self.values[i] = value;
        }
    }
}

/// One mutation applied to both a buffer and its model.
#[derive(Clone, Debug)]
pub enum BufferOp<T> {
    Append(T),
    Extend(Vec<T>),
    Reserve(usize),
    Consolidate,
    /// Write through the mutable view at `index % len`.
    Write { index: usize, value: T },
}

impl<T: Element> BufferOp<T> {
    /// Apply this operation to the real buffer and the model.
    pub fn apply(
        &self,
        buf: &mut GrowableBuffer<T>,
        model: &mut ModelBuffer<T>,
    ) -> Result<(), BufferError> {
        match self {
            Self::Append(v) => {
                buf.append(*v)?;
                model.append(*v);
            }
            Self::Extend(vs) => {
                buf.extend_from_slice(vs)?;
                model.extend(vs);
            }
            Self::Reserve(n) => {
                buf.reserve(*n)?;
                model.reserve(*n);
            }
            Self::Consolidate => {
                buf.consolidate()?;
                model.consolidate();
            }
            Self::Write { index, value } => {
                let view = buf.view_mut();
                if !view.is_empty() {
                    let i = index % view.len();
                    view[i] = *value;
                }
                model.write(*index, *value);
            }
        }
        Ok(())
    }
}

/// Compare a buffer against its model, describing the first mismatch.
pub fn check_agreement<T: Element>(
    buf: &GrowableBuffer<T>,
    model: &ModelBuffer<T>,
) -> Result<(), String> {
    if buf.size() != model.values.len() {
        return Err(format!(
            "size mismatch: buffer {}, model {}",
            buf.size(),
            model.values.len()
        ));
    }
    if buf.capacity() != model.capacity {
        return Err(format!(
            "capacity mismatch: buffer {}, model {}",
            buf.capacity(),
            model.capacity
        ));
    }
    if buf.generation() != model.generation {
        return Err(format!(
            "generation mismatch: buffer {}, model {}",
            buf.generation(),
            model.generation
        ));
    }
    if buf.view() != model.values.as_slice() {
        return Err(format!(
            "content mismatch: buffer {:?}, model {:?}",
            buf.view(),
            model.values
        ));
    }
    Ok(())
}

/// Strategy for a single [`BufferOp`] drawing element values from `values`.
///
/// Appends dominate so sequences actually exercise growth.
pub fn arb_op<T, S>(values: S) -> impl Strategy<Value = BufferOp<T>>
where
    T: Element,
    S: Strategy<Value = T> + Clone,
{
    prop_oneof![
        6 => values.clone().prop_map(BufferOp::Append),
        2 => prop::collection::vec(values.clone(), 0..24).prop_map(BufferOp::Extend),
        2 => (0usize..96).prop_map(BufferOp::Reserve),
        1 => Just(BufferOp::Consolidate),
        1 => (any::<usize>(), values).prop_map(|(index, value)| BufferOp::Write { index, value }),
    ]
}

/// Strategy for a sequence of up to `max_ops` operations.
pub fn arb_ops<T, S>(values: S, max_ops: usize) -> impl Strategy<Value = Vec<BufferOp<T>>>
where
    T: Element,
    S: Strategy<Value = T> + Clone,
{
    prop::collection::vec(arb_op(values), 0..max_ops)
}

/// Finite `f64` values, so equality comparisons are meaningful.
pub fn finite_f64() -> impl Strategy<Value = f64> + Clone {
    -1.0e9f64..1.0e9
}

/// Complex values with finite `f32` components.
pub fn finite_complex_f32() -> impl Strategy<Value = Complex<f32>> + Clone {
    (-1.0e6f32..1.0e6, -1.0e6f32..1.0e6).prop_map(|(re, im)| Complex::new(re, im))
}

/// Element types that can produce deterministic, index-dependent values.
pub trait Sample: Element {
    /// The `i`-th sample value. Distinct for small `i` where the type allows.
    fn sample(i: usize) -> Self;
}

macro_rules! impl_sample_int {
    ($($ty:ty),*) => {
        $(
            impl Sample for $ty {
                fn sample(i: usize) -> Self {
                    (i as $ty).wrapping_mul(3).wrapping_add(1)
                }
            }
        )*
    };
}

impl_sample_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl Sample for f32 {
    fn sample(i: usize) -> Self {
        i as f32 * 0.5 - 1.0
    }
}

impl Sample for f64 {
    fn sample(i: usize) -> Self {
        i as f64 * 0.25 - 2.0
    }
}

impl Sample for Complex<f32> {
    fn sample(i: usize) -> Self {
        Complex::new(i as f32, -(i as f32) * 0.5)
    }
}

impl Sample for Complex<f64> {
    fn sample(i: usize) -> Self {
        Complex::new(-(i as f64), i as f64 * 2.0)
    }
}

/// The first `n` sample values of `T`.
pub fn sample_values<T: Sample>(n: usize) -> Vec<T> {
    (0..n).map(T::sample).collect()
}

/// Build a buffer by appending `n` sample values from empty.
pub fn appended_buffer<T: Sample>(n: usize) -> GrowableBuffer<T> {
    let mut buf = GrowableBuffer::empty();
    for i in 0..n {
        buf.append(T::sample(i)).expect("test buffer allocation");
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_growth_sequence() {
        let mut model = ModelBuffer::<u8>::new(0);
        let mut caps = Vec::new();
        for i in 0..8 {
            model.append(i);
            caps.push(model.capacity);
        }
        assert_eq!(caps, vec![1, 3, 3, 7, 7, 7, 7, 15]);
        assert_eq!(model.generation, 4);
    }

    #[test]
    fn model_reserve_and_consolidate() {
        let mut model = ModelBuffer::<i32>::new(2);
        model.reserve(1);
        assert_eq!(model.generation, 0);
        model.reserve(10);
        assert_eq!(model.capacity, 10);
        model.consolidate();
        assert_eq!(model.capacity, 2);
        model.consolidate();
        assert_eq!(model.generation, 2);
    }

    #[test]
    fn samples_are_distinct_for_small_indices() {
        let v: Vec<u8> = sample_values(50);
        for w in v.windows(2) {
            assert_ne!(w[0], w[1]);
        }
        let c: Vec<Complex<f64>> = sample_values(3);
        assert_eq!(c[2], Complex::new(-2.0, 4.0));
    }
}
