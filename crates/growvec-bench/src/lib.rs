//! Benchmark workloads for growvec buffers.
//!
//! - [`AppendProfile`]: element counts exercised by the append benchmarks
//! - [`ramp`]: deterministic `f64` input data
//! - [`fill_by_append`] / [`fill_reserved`]: the two ways of building a
//!   buffer of known final size

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use growvec_core::{BufferError, GrowableBuffer};

/// Final element count of an append workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppendProfile {
    /// 1K elements: fits in L1 for every dtype.
    Small,
    /// 100K elements.
    Medium,
    /// 10M elements: growth copies dominate.
    Large,
}

impl AppendProfile {
    /// Every profile, smallest first.
    pub const ALL: [AppendProfile; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Number of elements appended.
    pub fn count(self) -> usize {
        match self {
            Self::Small => 1_000,
            Self::Medium => 100_000,
            Self::Large => 10_000_000,
        }
    }

    /// Short label for benchmark ids.
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "1k",
            Self::Medium => "100k",
            Self::Large => "10m",
        }
    }
}

/// `n` evenly spaced values starting at 0.
pub fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 * 0.5).collect()
}

/// Build a buffer one `append` at a time from empty.
pub fn fill_by_append(values: &[f64]) -> Result<GrowableBuffer<f64>, BufferError> {
    let mut buf = GrowableBuffer::empty();
    for &v in values {
        buf.append(v)?;
    }
    Ok(buf)
}

/// Reserve the final size first, then append.
pub fn fill_reserved(values: &[f64]) -> Result<GrowableBuffer<f64>, BufferError> {
    let mut buf = GrowableBuffer::empty();
    buf.reserve(values.len())?;
    for &v in values {
        buf.append(v)?;
    }
    Ok(buf)
}
