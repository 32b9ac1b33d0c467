//! Concrete buffer types for each supported element type.
//!
//! These are plain aliases; every one shares the generic implementation.

use crate::buffer::GrowableBuffer;
use crate::complex::Complex;

/// Buffer of `u8`.
pub type U8Buffer = GrowableBuffer<u8>;
/// Buffer of `u16`.
pub type U16Buffer = GrowableBuffer<u16>;
/// Buffer of `u32`.
pub type U32Buffer = GrowableBuffer<u32>;
/// Buffer of `u64`.
pub type U64Buffer = GrowableBuffer<u64>;

/// Buffer of `i8`.
pub type I8Buffer = GrowableBuffer<i8>;
/// Buffer of `i16`.
pub type I16Buffer = GrowableBuffer<i16>;
/// Buffer of `i32`.
pub type I32Buffer = GrowableBuffer<i32>;
/// Buffer of `i64`.
pub type I64Buffer = GrowableBuffer<i64>;

/// Buffer of `f32`.
pub type F32Buffer = GrowableBuffer<f32>;
/// Buffer of `f64`.
pub type F64Buffer = GrowableBuffer<f64>;

/// Buffer of complex numbers with `f32` components.
pub type ComplexF32Buffer = GrowableBuffer<Complex<f32>>;
/// Buffer of complex numbers with `f64` components.
pub type ComplexF64Buffer = GrowableBuffer<Complex<f64>>;
