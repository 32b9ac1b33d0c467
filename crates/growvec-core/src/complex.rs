//! Interleaved complex numbers.

use std::fmt;

/// A complex number stored as `(re, im)`.
///
/// `#[repr(C)]` pins the layout to two consecutive `F` values, the
/// interleaved convention flat-array consumers expect for complex data.
/// Only the storage is provided here; arithmetic is left to the consumer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex<F> {
    /// Real component.
    pub re: F,
    /// Imaginary component.
    pub im: F,
}

impl<F> Complex<F> {
    /// Create a complex number from its components.
    pub const fn new(re: F, im: F) -> Self {
        Self { re, im }
    }
}

impl<F: fmt::Display + PartialOrd + Default> fmt::Display for Complex<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < F::default() {
            write!(f, "{}{}i", self.re, self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

impl<F> From<(F, F)> for Complex<F> {
    fn from((re, im): (F, F)) -> Self {
        Self { re, im }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_two_components() {
        assert_eq!(std::mem::size_of::<Complex<f32>>(), 8);
        assert_eq!(std::mem::size_of::<Complex<f64>>(), 16);
        assert_eq!(std::mem::align_of::<Complex<f64>>(), 8);
    }

    #[test]
    fn display_signs() {
        assert_eq!(Complex::new(1.5f64, 2.0).to_string(), "1.5+2i");
        assert_eq!(Complex::new(1.0f32, -0.5).to_string(), "1-0.5i");
    }

    #[test]
    fn from_tuple() {
        let c: Complex<f32> = (3.0, 4.0).into();
        assert_eq!(c, Complex::new(3.0, 4.0));
    }
}
