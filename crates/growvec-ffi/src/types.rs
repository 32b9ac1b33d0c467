//! C-compatible structs and enums shared with callers.

use std::ffi::c_void;

use growvec_core::DType;

/// Element type code for `growvec_create`.
///
/// Mirrors [`DType`] so the generated header carries the constants.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowvecDType {
    /// `uint8_t`.
    U8 = 0,
    /// `uint16_t`.
    U16 = 1,
    /// `uint32_t`.
    U32 = 2,
    /// `uint64_t`.
    U64 = 3,
    /// `int8_t`.
    I8 = 4,
    /// `int16_t`.
    I16 = 5,
    /// `int32_t`.
    I32 = 6,
    /// `int64_t`.
    I64 = 7,
    /// `float`.
    F32 = 8,
    /// `double`.
    F64 = 9,
    /// Two `float`s, real then imaginary.
    ComplexF32 = 10,
    /// Two `double`s, real then imaginary.
    ComplexF64 = 11,
}

impl From<DType> for GrowvecDType {
    fn from(d: DType) -> Self {
        match d {
            DType::U8 => GrowvecDType::U8,
            DType::U16 => GrowvecDType::U16,
            DType::U32 => GrowvecDType::U32,
            DType::U64 => GrowvecDType::U64,
            DType::I8 => GrowvecDType::I8,
            DType::I16 => GrowvecDType::I16,
            DType::I32 => GrowvecDType::I32,
            DType::I64 => GrowvecDType::I64,
            DType::F32 => GrowvecDType::F32,
            DType::F64 => GrowvecDType::F64,
            DType::ComplexF32 => GrowvecDType::ComplexF32,
            DType::ComplexF64 => GrowvecDType::ComplexF64,
        }
    }
}

/// Zero-copy description of a buffer's valid prefix.
///
/// `data` points at `len` contiguous elements of `itemsize` bytes each.
/// It stays valid until the next mutating call on the same handle, and
/// `generation` changes whenever that storage is replaced.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct GrowvecView {
    /// First element. Dangling (non-null, aligned) when `len` is 0.
    pub data: *mut c_void,
    /// Number of valid elements.
    pub len: usize,
    /// Size of one element in bytes.
    pub itemsize: usize,
    /// Byte distance between consecutive elements.
    pub stride: usize,
    /// Element type code (see [`GrowvecDType`]).
    pub dtype: i32,
    /// Storage generation the pointer belongs to.
    pub generation: u64,
}

impl Default for GrowvecView {
    fn default() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
            itemsize: 0,
            stride: 0,
            dtype: 0,
            generation: 0,
        }
    }
}

/// Construction parameters for `growvec_create_with_config`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowvecConfig {
    /// Element type code (see [`GrowvecDType`]).
    pub dtype: i32,
    /// Number of zeroed, valid elements after construction.
    pub initial_size: usize,
    /// Capacity to reserve after construction.
    pub reserve: usize,
}
