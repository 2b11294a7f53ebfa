//! Conversions between amplitude, intensity and decibels, plus whole-signal
//! loudness measurement and normalisation.
//!
//! Square roots and logarithms have safe variants so that silent audio never
//! produces NaN, infinities or an unbounded slope at zero:
//!
//! - [`Guard::Epsilon`] computes `sqrt(x + eps) - sqrt(eps)`, which is exactly
//!   `0` at `x = 0` and has a finite derivative there.
//! - [`intensity_to_db`] clamps at a floor ([`DEFAULT_DB_FLOOR`] by default)
//!   instead of returning `-inf`.
//!
//! ```
//! use framewise::loudness::{impose_loudness, measure_loudness};
//!
//! let x: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.05).sin()).collect();
//! let y = impose_loudness(&x, -20.0);
//! assert!((measure_loudness(&y) - -20.0).abs() < 1e-4);
//! ```

use alloc::vec::Vec;

use crate::num::{mean, Sample};

/// Epsilon used by [`Guard::default`].
pub const DEFAULT_EPS: f64 = 1e-7;

/// Lowest decibel value returned by the clamped conversions.
pub const DEFAULT_DB_FLOOR: f64 = -100.0;

/// How a square root near zero is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guard<T> {
    /// Plain `sqrt(x)`; slope is unbounded at `0`.
    Exact,
    /// `sqrt(x + eps) - sqrt(eps)`.
    Epsilon(T),
}

impl<T: Sample> Default for Guard<T> {
    fn default() -> Self {
        Guard::Epsilon(T::cast(DEFAULT_EPS))
    }
}

impl<T: Sample> Guard<T> {
    #[inline]
    pub fn sqrt(self, x: T) -> T {
        match self {
            Guard::Exact => x.sqrt(),
            Guard::Epsilon(eps) => (x + eps).sqrt() - eps.sqrt(),
        }
    }
}

#[inline]
pub fn amplitude_to_intensity<T: Sample>(x: T) -> T {
    x * x
}

#[inline]
pub fn intensity_to_amplitude<T: Sample>(x: T, guard: Guard<T>) -> T {
    guard.sqrt(x)
}

/// `10 log10(x)`, clamped to `floor` when one is given.
#[inline]
pub fn intensity_to_db<T: Sample>(x: T, floor: Option<T>) -> T {
    let db = T::cast(10.0) * x.log10();
    match floor {
        // NaN from log10 of a negative value also ends up at the floor
        Some(min) if !(db >= min) => min,
        _ => db,
    }
}

#[inline]
pub fn db_to_intensity<T: Sample>(db: T) -> T {
    T::cast(10.0).powf(db / T::cast(10.0))
}

/// `20 log10(|x|)` clamped at [`DEFAULT_DB_FLOOR`].
#[inline]
pub fn amplitude_to_db<T: Sample>(x: T) -> T {
    intensity_to_db(amplitude_to_intensity(x), Some(T::cast(DEFAULT_DB_FLOOR)))
}

/// Exact inverse of [`amplitude_to_db`] above the floor.
#[inline]
pub fn db_to_amplitude<T: Sample>(db: T) -> T {
    T::cast(10.0).powf(db / T::cast(20.0))
}

/// Mean of `x^2` over the whole signal; `0` for empty input.
fn mean_intensity<T: Sample>(x: &[T]) -> T {
    if x.is_empty() {
        return T::ZERO;
    }
    let mut acc = T::ZERO;
    for &s in x {
        acc += amplitude_to_intensity(s);
    }
    acc / T::cast_usize(x.len())
}

/// Mean intensity of the whole signal in dB, clamped at
/// [`DEFAULT_DB_FLOOR`]. Silence and empty input read as the floor.
pub fn measure_loudness<T: Sample>(x: &[T]) -> T {
    intensity_to_db(mean_intensity(x), Some(T::cast(DEFAULT_DB_FLOOR)))
}

/// Scale the signal by `gain_db`.
pub fn apply_gain<T: Sample>(x: &[T], gain_db: T) -> Vec<T> {
    let g = db_to_amplitude(gain_db);
    x.iter().map(|&s| s * g).collect()
}

/// Rescale `x` so that [`measure_loudness`] of the result is `target_db`.
///
/// The gain comes from the unclamped mean intensity, so inputs quieter than
/// the floor are still brought up to the target. Silent input stays silent.
pub fn impose_loudness<T: Sample>(x: &[T], target_db: T) -> Vec<T> {
    let intensity = mean_intensity(x);
    log_trace!(
        "impose_loudness: mean intensity {:?}, target {:?} dB",
        intensity,
        target_db
    );
    if !(intensity > T::ZERO) {
        return x.to_vec();
    }
    let g = (db_to_intensity(target_db) / intensity).sqrt();
    x.iter().map(|&s| s * g).collect()
}

/// Convert a linear-magnitude contour to dB.
pub fn contour_to_db<T: Sample>(contour: &[T]) -> Vec<T> {
    contour.iter().map(|&m| amplitude_to_db(m)).collect()
}

/// Convert an intensity contour to magnitude with the given guard.
pub fn contour_to_amplitude<T: Sample>(contour: &[T], guard: Guard<T>) -> Vec<T> {
    contour
        .iter()
        .map(|&i| intensity_to_amplitude(i, guard))
        .collect()
}

/// Mean level of a contour in dB, for summarising per-frame levels.
pub fn mean_db<T: Sample>(contour_db: &[T]) -> T {
    mean(contour_db)
}
