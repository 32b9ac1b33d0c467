//! Runtime-tagged buffer stored behind an FFI handle.
//!
//! C callers pick the element type with a dtype code, so the handle table
//! holds one enum over every concrete buffer alias and dispatches with
//! `with_buffer!`.

use std::ffi::c_void;

use growvec_core::{
    BufferConfig, BufferError, ComplexF32Buffer, ComplexF64Buffer, DType, Element, F32Buffer,
    F64Buffer, GrowableBuffer, I16Buffer, I32Buffer, I64Buffer, I8Buffer, U16Buffer, U32Buffer,
    U64Buffer, U8Buffer,
};

use crate::status::GrowvecStatus;
use crate::types::GrowvecView;

pub(crate) enum AnyBuffer {
    U8(U8Buffer),
    U16(U16Buffer),
    U32(U32Buffer),
    U64(U64Buffer),
    I8(I8Buffer),
    I16(I16Buffer),
    I32(I32Buffer),
    I64(I64Buffer),
    F32(F32Buffer),
    F64(F64Buffer),
    ComplexF32(ComplexF32Buffer),
    ComplexF64(ComplexF64Buffer),
}

/// Bind the concrete buffer inside an [`AnyBuffer`] and evaluate `$body`.
macro_rules! with_buffer {
    ($any:expr, $buf:ident => $body:expr) => {
        match $any {
            AnyBuffer::U8($buf) => $body,
            AnyBuffer::U16($buf) => $body,
            AnyBuffer::U32($buf) => $body,
            AnyBuffer::U64($buf) => $body,
            AnyBuffer::I8($buf) => $body,
            AnyBuffer::I16($buf) => $body,
            AnyBuffer::I32($buf) => $body,
            AnyBuffer::I64($buf) => $body,
            AnyBuffer::F32($buf) => $body,
            AnyBuffer::F64($buf) => $body,
            AnyBuffer::ComplexF32($buf) => $body,
            AnyBuffer::ComplexF64($buf) => $body,
        }
    };
}

impl AnyBuffer {
    /// Build a buffer of element type `dtype` from `config`.
    pub fn build(dtype: DType, config: &BufferConfig) -> Result<Self, BufferError> {
        Ok(match dtype {
            DType::U8 => AnyBuffer::U8(config.build()?),
            DType::U16 => AnyBuffer::U16(config.build()?),
            DType::U32 => AnyBuffer::U32(config.build()?),
            DType::U64 => AnyBuffer::U64(config.build()?),
            DType::I8 => AnyBuffer::I8(config.build()?),
            DType::I16 => AnyBuffer::I16(config.build()?),
            DType::I32 => AnyBuffer::I32(config.build()?),
            DType::I64 => AnyBuffer::I64(config.build()?),
            DType::F32 => AnyBuffer::F32(config.build()?),
            DType::F64 => AnyBuffer::F64(config.build()?),
            DType::ComplexF32 => AnyBuffer::ComplexF32(config.build()?),
            DType::ComplexF64 => AnyBuffer::ComplexF64(config.build()?),
        })
    }

    pub fn dtype(&self) -> DType {
        with_buffer!(self, b => b.dtype())
    }

    pub fn len(&self) -> usize {
        with_buffer!(self, b => b.size())
    }

    pub fn capacity(&self) -> usize {
        with_buffer!(self, b => b.capacity())
    }

    pub fn generation(&self) -> u64 {
        with_buffer!(self, b => b.generation())
    }

    pub fn reserve(&mut self, capacity: usize) -> Result<(), BufferError> {
        with_buffer!(self, b => b.reserve(capacity))
    }

    pub fn consolidate(&mut self) -> Result<(), BufferError> {
        with_buffer!(self, b => b.consolidate())
    }

    /// Export the valid prefix without copying.
    pub fn view(&mut self) -> GrowvecView {
        with_buffer!(self, b => view_of(b))
    }

    /// Append one element read from `value`.
    ///
    /// # Safety
    ///
    /// `value` must point to one readable element of this buffer's dtype.
    /// It need not be aligned.
    #[allow(unsafe_code)]
    pub unsafe fn append_raw(&mut self, value: *const c_void) -> Result<(), BufferError> {
        // SAFETY: forwarded caller contract.
        with_buffer!(self, b => unsafe { append_from(b, value) })
    }

    /// Append `count` contiguous elements starting at `values`.
    ///
    /// Returns `InvalidArgument` if `values` is null or misaligned for the
    /// dtype while `count > 0`.
    ///
    /// # Safety
    ///
    /// When `count > 0`, `values` must point to `count` readable elements of
    /// this buffer's dtype that do not overlap the buffer's own storage.
    #[allow(unsafe_code)]
    pub unsafe fn extend_raw(&mut self, values: *const c_void, count: usize) -> GrowvecStatus {
        // SAFETY: forwarded caller contract.
        with_buffer!(self, b => unsafe { extend_from(b, values, count) })
    }
}

fn view_of<T: Element>(buf: &mut GrowableBuffer<T>) -> GrowvecView {
    let desc = buf.describe();
    let (len, itemsize, stride) = (desc.len(), desc.itemsize(), desc.stride());
    GrowvecView {
        data: buf.as_mut_ptr().cast::<c_void>(),
        len,
        itemsize,
        stride,
        dtype: T::DTYPE.code(),
        generation: buf.generation(),
    }
}

#[allow(unsafe_code)]
unsafe fn append_from<T: Element>(
    buf: &mut GrowableBuffer<T>,
    value: *const c_void,
) -> Result<(), BufferError> {
    // SAFETY: caller guarantees one readable `T` at `value`; every element
    // type accepts any bit pattern.
    let v = unsafe { value.cast::<T>().read_unaligned() };
    buf.append(v)
}

#[allow(unsafe_code)]
unsafe fn extend_from<T: Element>(
    buf: &mut GrowableBuffer<T>,
    values: *const c_void,
    count: usize,
) -> GrowvecStatus {
    if count == 0 {
        return GrowvecStatus::Ok;
    }
    let ptr = values.cast::<T>();
    if ptr.is_null() || !ptr.is_aligned() {
        return GrowvecStatus::InvalidArgument;
    }
    // SAFETY: non-null, aligned, and caller guarantees `count` readable
    // elements outside the buffer's storage.
    let slice = unsafe { std::slice::from_raw_parts(ptr, count) };
    GrowvecStatus::from(buf.extend_from_slice(slice))
}
