//! growvec: growable, contiguous numeric buffers with zero-copy views.
//!
//! This is the top-level facade crate. It re-exports the buffer API from
//! `growvec-core`; the C interface lives in `growvec-ffi`.
//!
//! # Quick start
//!
//! ```rust
//! use growvec::prelude::*;
//!
//! let mut buf = F64Buffer::new(0).unwrap();
//! buf.reserve(10).unwrap();
//! for i in 0..10 {
//!     buf.append(i as f64).unwrap();
//! }
//! // Ten appends into a reservation of ten: no reallocation.
//! assert_eq!(buf.generation(), 1);
//!
//! buf.append(10.0).unwrap();
//! assert_eq!(buf.capacity(), 21);
//!
//! buf.consolidate().unwrap();
//! let array = buf.describe();
//! assert_eq!(array.shape(), [11]);
//! assert_eq!(array.typestr(), "<f8");
//! assert_eq!(array.as_slice()[10], 10.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`buffer`] | `growvec-core` | `GrowableBuffer`, element types, errors, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Growable buffers, element types, and flat-array views (`growvec-core`).
///
/// Everything in [`prelude`] plus [`buffer::grown_capacity`] and the
/// individual module paths.
pub use growvec_core as buffer;

/// Common imports for typical growvec usage.
///
/// ```rust
/// use growvec::prelude::*;
/// ```
pub mod prelude {
    // Buffer and element types
    pub use growvec_core::{Complex, DType, Element, FlatArray, GrowableBuffer};

    // Concrete aliases
    pub use growvec_core::{
        ComplexF32Buffer, ComplexF64Buffer, F32Buffer, F64Buffer, I16Buffer, I32Buffer,
        I64Buffer, I8Buffer, U16Buffer, U32Buffer, U64Buffer, U8Buffer,
    };

    // Construction and errors
    pub use growvec_core::{BufferConfig, BufferError};
}
