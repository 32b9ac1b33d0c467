//! Growable contiguous numeric buffers with explicit capacity control.
//!
//! [`GrowableBuffer<T>`] owns a single contiguous block of `T` and keeps its
//! logical length separate from its capacity, so the valid prefix can be
//! handed to flat-array numeric code without copying. Capacity changes are
//! always explicit block replacements:
//!
//! ```text
//! append       full?  capacity -> capacity * 2 + 1   (tail uninitialised)
//! reserve(n)   n > capacity?  capacity -> n          (tail zero-filled)
//! consolidate  capacity -> len
//! ```
//!
//! Views are borrows of the buffer, so a view cannot outlive the storage it
//! points into: mutating a buffer while a view is alive does not compile.
//!
//! # Element types
//!
//! [`Element`] is implemented for the fixed-width integers, `f32`, `f64`
//! and [`Complex`] over both float widths. [`aliases`] names one buffer
//! type per element type.
//!
//! # Unsafe code
//!
//! All `unsafe` is confined to the private `raw` module, which manages the
//! partially initialised backing block.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod aliases;
pub mod buffer;
pub mod complex;
pub mod config;
pub mod element;
pub mod error;
mod raw;
pub mod view;

// Public re-exports for the primary API surface.
pub use aliases::*;
pub use buffer::{grown_capacity, GrowableBuffer};
pub use complex::Complex;
pub use config::BufferConfig;
pub use element::{DType, Element};
pub use error::BufferError;
pub use view::FlatArray;
