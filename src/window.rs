//! Analysis/synthesis windows.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::FrameError;
use crate::num::{mean, Sample};

/// Per-sample weights applied to every frame of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<T> {
    taps: Vec<T>,
}

impl<T: Sample> Window<T> {
    /// Wrap caller-provided taps.
    pub fn from_taps(taps: Vec<T>) -> Self {
        Self { taps }
    }

    /// Hann window evaluated on `len + 2` points with both zero endpoints
    /// dropped. No tap is zero, so no sample is lost at frame boundaries.
    pub fn trimmed_hann(len: usize) -> Self {
        let denom = T::cast_usize(len + 1);
        let two_pi = T::cast(2.0) * T::PI;
        let taps = (1..=len)
            .map(|n| {
                T::cast(0.5) - T::cast(0.5) * (two_pi * T::cast_usize(n) / denom).cos()
            })
            .collect();
        Self { taps }
    }

    /// Periodic Hann window of length `len`.
    pub fn hann(len: usize) -> Self {
        Self::cosine_sum(len, &[0.5, 0.5])
    }

    /// Periodic Hamming window of length `len`.
    pub fn hamming(len: usize) -> Self {
        Self::cosine_sum(len, &[0.54, 0.46])
    }

    /// Periodic Blackman window of length `len`.
    pub fn blackman(len: usize) -> Self {
        Self::cosine_sum(len, &[0.42, 0.5, 0.08])
    }

    /// All-ones window.
    pub fn rectangular(len: usize) -> Self {
        Self {
            taps: vec![T::ONE; len],
        }
    }

    /// `a0 - a1 cos(2πn/N) + a2 cos(4πn/N) - ...`
    fn cosine_sum(len: usize, coeffs: &[f64]) -> Self {
        let n_total = T::cast_usize(len.max(1));
        let two_pi = T::cast(2.0) * T::PI;
        let taps = (0..len)
            .map(|n| {
                let x = two_pi * T::cast_usize(n) / n_total;
                let mut acc = T::ZERO;
                let mut sign = T::ONE;
                for (k, &a) in coeffs.iter().enumerate() {
                    acc += sign * T::cast(a) * (x * T::cast_usize(k)).cos();
                    sign = -sign;
                }
                acc
            })
            .collect();
        Self { taps }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.taps
    }

    /// Mean tap value, used to undo the level bias of windowing.
    pub fn mean(&self) -> T {
        mean(&self.taps)
    }

    pub fn sum_of_squares(&self) -> T {
        let mut acc = T::ZERO;
        for &w in &self.taps {
            acc += w * w;
        }
        acc
    }

    /// [`FrameError::ShapeMismatch`] unless the window has `win_length` taps.
    pub fn check_len(&self, win_length: usize) -> Result<(), FrameError> {
        if self.taps.len() != win_length {
            return Err(FrameError::ShapeMismatch {
                expected: win_length,
                actual: self.taps.len(),
            });
        }
        Ok(())
    }
}

impl<T: Sample> AsRef<[T]> for Window<T> {
    fn as_ref(&self) -> &[T] {
        &self.taps
    }
}
