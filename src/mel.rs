//! Mel filterbank on the Slaney scale.
//!
//! The scale is linear below 1 kHz and logarithmic above. Filters are
//! triangular in Hz and area-normalised (`2 / (f_hi - f_lo)`), so the same
//! spectrum projected through filterbanks of different widths stays
//! comparable.

use alloc::vec::Vec;

use crate::error::FrameError;
use crate::num::Sample;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

#[inline]
fn log_step() -> f64 {
    libm::log(6.4) / 27.0
}

/// Hz to Slaney mel.
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + libm::log(hz / MIN_LOG_HZ) / log_step()
    } else {
        hz / F_SP
    }
}

/// Slaney mel to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * libm::exp(log_step() * (mel - MIN_LOG_MEL))
    } else {
        mel * F_SP
    }
}

/// `n_mels x (n_fft / 2 + 1)` triangular weights.
#[derive(Debug, Clone, PartialEq)]
pub struct MelFilterbank<T> {
    weights: Vec<Vec<T>>,
    n_bins: usize,
}

impl<T: Sample> MelFilterbank<T> {
    /// Build `n_mels` filters spanning `fmin..fmax` Hz.
    ///
    /// `fmax` of `None` means the Nyquist frequency.
    pub fn new(
        sample_rate: u32,
        n_fft: usize,
        n_mels: usize,
        fmin: f64,
        fmax: Option<f64>,
    ) -> Result<Self, FrameError> {
        let nyquist = sample_rate as f64 / 2.0;
        let fmax = fmax.unwrap_or(nyquist);
        if sample_rate == 0 || n_fft == 0 {
            return Err(FrameError::InvalidConfig("mel: empty FFT or sample rate"));
        }
        if n_mels == 0 {
            return Err(FrameError::InvalidConfig("mel: n_mels must be positive"));
        }
        if !(fmin >= 0.0 && fmin < fmax && fmax <= nyquist) {
            return Err(FrameError::InvalidConfig(
                "mel: need 0 <= fmin < fmax <= sample_rate / 2",
            ));
        }

        let n_bins = n_fft / 2 + 1;
        let (mel_lo, mel_hi) = (hz_to_mel(fmin), hz_to_mel(fmax));
        let edges: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_lo + (mel_hi - mel_lo) * i as f64 / (n_mels + 1) as f64))
            .collect();
        let bin_hz = |k: usize| k as f64 * sample_rate as f64 / n_fft as f64;

        let weights = edges
            .windows(3)
            .map(|e| {
                let (lo, mid, hi) = (e[0], e[1], e[2]);
                let enorm = 2.0 / (hi - lo);
                (0..n_bins)
                    .map(|k| {
                        let f = bin_hz(k);
                        let rise = (f - lo) / (mid - lo);
                        let fall = (hi - f) / (hi - mid);
                        T::cast(rise.min(fall).max(0.0) * enorm)
                    })
                    .collect()
            })
            .collect();
        log_debug!(
            "mel: {} filters over {}..{} Hz, {} bins",
            n_mels,
            fmin,
            fmax,
            n_bins
        );
        Ok(Self { weights, n_bins })
    }

    #[inline]
    pub fn n_mels(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Weights of filter `m`.
    pub fn filter(&self, m: usize) -> Option<&[T]> {
        self.weights.get(m).map(Vec::as_slice)
    }

    /// Project one frame of `n_bins` magnitudes (or powers) onto the filters.
    pub fn apply(&self, frame: &[T]) -> Result<Vec<T>, FrameError> {
        if frame.len() != self.n_bins {
            return Err(FrameError::ShapeMismatch {
                expected: self.n_bins,
                actual: frame.len(),
            });
        }
        Ok(self
            .weights
            .iter()
            .map(|w| {
                let mut acc = T::ZERO;
                for (&wi, &x) in w.iter().zip(frame) {
                    acc += wi * x;
                }
                acc
            })
            .collect())
    }
}
