//! Sample type abstraction.
//!
//! Every public routine is generic over [`Sample`], implemented for `f32` and
//! `f64`. Transcendental functions go through `libm` so the framing, level and
//! loudness paths work without `std`.
//!
//! Method names deliberately avoid the ones defined by `num_traits`
//! (`zero`, `one`, `abs`, `from_f64`, ...) so that `Sample` can be combined
//! with `realfft::FftNum` in the same bound without ambiguous calls.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub trait Sample:
    Copy
    + Clone
    + Default
    + PartialEq
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;
    const ONE: Self;
    const PI: Self;

    /// Lossy conversion from an `f64` constant.
    fn cast(x: f64) -> Self;
    /// Lossy conversion from a count or index.
    fn cast_usize(x: usize) -> Self;

    fn fabs(self) -> Self;
    fn sqrt(self) -> Self;
    fn ln(self) -> Self;
    fn log10(self) -> Self;
    fn powf(self, e: Self) -> Self;
    fn cos(self) -> Self;
}

impl Sample for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const PI: Self = core::f32::consts::PI;

    #[inline]
    fn cast(x: f64) -> Self {
        x as f32
    }
    #[inline]
    fn cast_usize(x: usize) -> Self {
        x as f32
    }
    #[inline]
    fn fabs(self) -> Self {
        libm::fabsf(self)
    }
    #[inline]
    fn sqrt(self) -> Self {
        libm::sqrtf(self)
    }
    #[inline]
    fn ln(self) -> Self {
        libm::logf(self)
    }
    #[inline]
    fn log10(self) -> Self {
        libm::log10f(self)
    }
    #[inline]
    fn powf(self, e: Self) -> Self {
        libm::powf(self, e)
    }
    #[inline]
    fn cos(self) -> Self {
        libm::cosf(self)
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const PI: Self = core::f64::consts::PI;

    #[inline]
    fn cast(x: f64) -> Self {
        x
    }
    #[inline]
    fn cast_usize(x: usize) -> Self {
        x as f64
    }
    #[inline]
    fn fabs(self) -> Self {
        libm::fabs(self)
    }
    #[inline]
    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }
    #[inline]
    fn ln(self) -> Self {
        libm::log(self)
    }
    #[inline]
    fn log10(self) -> Self {
        libm::log10(self)
    }
    #[inline]
    fn powf(self, e: Self) -> Self {
        libm::pow(self, e)
    }
    #[inline]
    fn cos(self) -> Self {
        libm::cos(self)
    }
}

/// Arithmetic mean of a slice, `0` for an empty slice.
#[inline]
pub fn mean<T: Sample>(xs: &[T]) -> T {
    if xs.is_empty() {
        return T::ZERO;
    }
    let mut acc = T::ZERO;
    for &x in xs {
        acc += x;
    }
    acc / T::cast_usize(xs.len())
}
