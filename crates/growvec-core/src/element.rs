//! Element types a [`GrowableBuffer`](crate::GrowableBuffer) can hold.
//!
//! The set is closed: fixed-width integers, IEEE floats, and
//! [`Complex`] over either float width. Each element type carries its
//! [`DType`] so a buffer can describe its memory to a flat-array consumer
//! without any runtime type lookup.

use std::fmt;

use crate::complex::Complex;

/// Runtime tag for the element type of a flat buffer.
///
/// Discriminants are ABI-stable and shared with the C interface.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// Unsigned 8-bit integer.
    U8 = 0,
    /// Unsigned 16-bit integer.
    U16 = 1,
    /// Unsigned 32-bit integer.
    U32 = 2,
    /// Unsigned 64-bit integer.
    U64 = 3,
    /// Signed 8-bit integer.
    I8 = 4,
    /// Signed 16-bit integer.
    I16 = 5,
    /// Signed 32-bit integer.
    I32 = 6,
    /// Signed 64-bit integer.
    I64 = 7,
    /// IEEE 754 binary32.
    F32 = 8,
    /// IEEE 754 binary64.
    F64 = 9,
    /// Complex number with binary32 components.
    ComplexF32 = 10,
    /// Complex number with binary64 components.
    ComplexF64 = 11,
}

impl DType {
    /// Every dtype, in discriminant order.
    pub const ALL: [DType; 12] = [
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::F32,
        DType::F64,
        DType::ComplexF32,
        DType::ComplexF64,
    ];

    /// Look up a dtype by its ABI code.
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// ABI code of this dtype.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Size of one element in bytes.
    pub fn itemsize(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 | Self::ComplexF32 => 8,
            Self::ComplexF64 => 16,
        }
    }

    /// Conventional array-library name (`"uint8"`, `"complex128"`, ...).
    ///
    /// Complex names follow the total-width convention, so `ComplexF32`
    /// is `"complex64"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::ComplexF32 => "complex64",
            Self::ComplexF64 => "complex128",
        }
    }

    /// Single-character kind code: `'u'`, `'i'`, `'f'` or `'c'`.
    pub fn kind(self) -> char {
        match self {
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => 'u',
            Self::I8 | Self::I16 | Self::I32 | Self::I64 => 'i',
            Self::F32 | Self::F64 => 'f',
            Self::ComplexF32 | Self::ComplexF64 => 'c',
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A plain-old-data numeric type storable in a buffer.
///
/// Sealed: the implementations below are the complete set. All of them are
/// `Copy` with no drop glue, which is what lets the buffer leave its spare
/// capacity uninitialised and copy prefixes with a single memcpy.
pub trait Element:
    sealed::Sealed + Copy + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Runtime tag for this type.
    const DTYPE: DType;

    /// The all-zero value of this type.
    const ZERO: Self;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident, $zero:expr;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
                const ZERO: Self = $zero;
            }
        )*
    };
}

impl_element! {
    u8 => U8, 0;
    u16 => U16, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    i8 => I8, 0;
    i16 => I16, 0;
    i32 => I32, 0;
    i64 => I64, 0;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
    Complex<f32> => ComplexF32, Complex::new(0.0, 0.0);
    Complex<f64> => ComplexF64, Complex::new(0.0, 0.0);
}
