//! Short-time Fourier transform with exact overlap-add synthesis.
//!
//! [`Stft`] pads and frames the waveform with a [`FrameSpec`], windows each
//! frame, zero-extends it to `n_fft` and runs a real FFT. Synthesis inverts
//! every frame, applies the same window again and overlap-adds with a
//! per-sample normaliser equal to the sum of squared window taps covering that
//! sample, then crops the padding. Analysis always drops the incomplete
//! trailing frame so the frame grid is reconstructable.
//!
//! With `n_fft > win_length` the windowed frame sits at the start of the FFT
//! buffer and the zeros follow it. Magnitudes and the round trip do not
//! depend on that placement; bin phases carry a linear term relative to a
//! window centered in the buffer.
//!
//! # Example
//! ```
//! use framewise::frames::FrameSpec;
//! use framewise::padding::CenterMode;
//! use framewise::stft::{Stft, StftConfig};
//!
//! let frame = FrameSpec::new(64, 16, CenterMode::HalfHop, true).unwrap();
//! let stft = Stft::<f64>::new(StftConfig::new(frame));
//! let x: Vec<f64> = (0..16 * 20).map(|i| (i as f64 * 0.1).sin()).collect();
//! let spec = stft.analyze(&x).unwrap();
//! assert_eq!(spec.n_bins(), 33);
//! let y = stft.synthesize(&spec).unwrap();
//! assert_eq!(y.len(), x.len());
//! assert!(x.iter().zip(&y).all(|(a, b)| (a - b).abs() < 1e-9));
//! ```

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, FftNum, RealFftPlanner, RealToComplex};

use crate::error::FrameError;
use crate::exec::ExecContext;
use crate::frames::{frame, frame_count, FrameSpec};
use crate::num::Sample;
use crate::window::Window;

/// Envelope values at or below this are left undivided during overlap-add.
const MIN_ENVELOPE: f64 = 1e-30;

/// Float types usable with the FFT path.
pub trait FftSample: Sample + FftNum {}

impl<T: Sample + FftNum> FftSample for T {}

/// Transform parameters: frame geometry, FFT size and window.
#[derive(Debug, Clone, PartialEq)]
pub struct StftConfig<T> {
    frame: FrameSpec,
    n_fft: usize,
    window: Window<T>,
}

impl<T: Sample> StftConfig<T> {
    /// `n_fft = win_length` and the trimmed Hann window.
    ///
    /// `drop_incomplete_frame` is forced on.
    pub fn new(frame: FrameSpec) -> Self {
        let frame = frame.with_drop_incomplete_frame(true);
        Self {
            n_fft: frame.win_length(),
            window: Window::trimmed_hann(frame.win_length()),
            frame,
        }
    }

    /// Zero-extend frames to `n_fft` before the FFT.
    pub fn with_n_fft(mut self, n_fft: usize) -> Result<Self, FrameError> {
        if n_fft < self.frame.win_length() {
            return Err(FrameError::ShapeMismatch {
                expected: self.frame.win_length(),
                actual: n_fft,
            });
        }
        self.n_fft = n_fft;
        Ok(self)
    }

    /// Use `window` for both analysis and synthesis.
    pub fn with_window(mut self, window: Window<T>) -> Result<Self, FrameError> {
        window.check_len(self.frame.win_length())?;
        self.window = window;
        Ok(self)
    }

    #[inline]
    pub fn frame(&self) -> &FrameSpec {
        &self.frame
    }

    #[inline]
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    #[inline]
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    #[inline]
    pub fn window(&self) -> &Window<T> {
        &self.window
    }
}

/// Frames of complex spectra, `n_fft / 2 + 1` bins each.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram<T> {
    pub frames: Vec<Vec<Complex<T>>>,
    pub n_fft: usize,
}

impl<T: Sample> Spectrogram<T> {
    #[inline]
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// `|X|` per frame and bin.
    pub fn magnitudes(&self) -> Vec<Vec<T>> {
        self.map_bins(|c| (c.re * c.re + c.im * c.im).sqrt())
    }

    /// `|X|^2` per frame and bin.
    pub fn powers(&self) -> Vec<Vec<T>> {
        self.map_bins(|c| c.re * c.re + c.im * c.im)
    }

    fn map_bins(&self, f: impl Fn(&Complex<T>) -> T) -> Vec<Vec<T>> {
        self.frames
            .iter()
            .map(|bins| bins.iter().map(&f).collect())
            .collect()
    }
}

/// Planned forward/inverse transform for one [`StftConfig`].
pub struct Stft<T: FftSample> {
    config: StftConfig<T>,
    forward: Arc<dyn RealToComplex<T>>,
    inverse: Arc<dyn ComplexToReal<T>>,
}

impl<T: FftSample> fmt::Debug for Stft<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stft")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: FftSample> Clone for Stft<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            forward: Arc::clone(&self.forward),
            inverse: Arc::clone(&self.inverse),
        }
    }
}

impl<T: FftSample> Stft<T> {
    pub fn new(config: StftConfig<T>) -> Self {
        let mut planner = RealFftPlanner::<T>::new();
        let forward = planner.plan_fft_forward(config.n_fft);
        let inverse = planner.plan_fft_inverse(config.n_fft);
        log_debug!(
            "stft: planned n_fft={} win={} hop={} center={:?}",
            config.n_fft,
            config.frame.win_length(),
            config.frame.hop_length(),
            config.frame.center()
        );
        Self {
            config,
            forward,
            inverse,
        }
    }

    #[inline]
    pub fn config(&self) -> &StftConfig<T> {
        &self.config
    }

    /// Frames [`Stft::analyze`] yields for `nsamples` input samples.
    pub fn frame_count(&self, nsamples: usize) -> usize {
        frame_count(nsamples, &self.config.frame)
    }

    /// Forward transform on the calling thread.
    pub fn analyze(&self, audio: &[T]) -> Result<Spectrogram<T>, FrameError> {
        self.analyze_with(&ExecContext::serial(), audio)
    }

    /// Forward transform with per-frame FFTs dispatched on `ctx`.
    pub fn analyze_with(
        &self,
        ctx: &ExecContext,
        audio: &[T],
    ) -> Result<Spectrogram<T>, FrameError> {
        let frames = frame(audio, &self.config.frame);
        let views: Vec<&[T]> = frames.iter().collect();
        log_trace!(
            "stft: analyze {} samples into {} frames",
            audio.len(),
            views.len()
        );
        let spectra = ctx.try_map(&views, |f| self.forward_frame(f))?;
        Ok(Spectrogram {
            frames: spectra,
            n_fft: self.config.n_fft,
        })
    }

    fn forward_frame(&self, frame: &[T]) -> Result<Vec<Complex<T>>, FrameError> {
        let mut input = self.forward.make_input_vec();
        for ((dst, &x), &w) in input
            .iter_mut()
            .zip(frame)
            .zip(self.config.window.as_slice())
        {
            *dst = x * w;
        }
        let mut output = self.forward.make_output_vec();
        self.forward
            .process(&mut input, &mut output)
            .map_err(|_| FrameError::Fft)?;
        Ok(output)
    }

    /// Inverse FFT of one frame, scaled by `1 / n_fft`, truncated to
    /// `win_length` and windowed for overlap-add.
    fn inverse_frame(&self, bins: &[Complex<T>]) -> Result<Vec<T>, FrameError> {
        let n_bins = self.config.n_bins();
        if bins.len() != n_bins {
            return Err(FrameError::ShapeMismatch {
                expected: n_bins,
                actual: bins.len(),
            });
        }
        let mut spectrum = bins.to_vec();
        // DC and Nyquist of a real signal carry no imaginary part
        spectrum[0].im = T::ZERO;
        if self.config.n_fft % 2 == 0 {
            spectrum[n_bins - 1].im = T::ZERO;
        }
        let mut output = self.inverse.make_output_vec();
        self.inverse
            .process(&mut spectrum, &mut output)
            .map_err(|_| FrameError::Fft)?;
        let scale = T::ONE / T::cast_usize(self.config.n_fft);
        output.truncate(self.config.frame.win_length());
        for (y, &w) in output.iter_mut().zip(self.config.window.as_slice()) {
            *y = *y * scale * w;
        }
        Ok(output)
    }

    /// Inverse transform on the calling thread.
    pub fn synthesize(&self, spec: &Spectrogram<T>) -> Result<Vec<T>, FrameError> {
        self.synthesize_with(&ExecContext::serial(), spec)
    }

    /// Inverse transform with per-frame inverse FFTs and overlap-add output
    /// ranges dispatched on `ctx`.
    pub fn synthesize_with(
        &self,
        ctx: &ExecContext,
        spec: &Spectrogram<T>,
    ) -> Result<Vec<T>, FrameError> {
        // n_fft 16 and 17 share a bin count, so compare transform sizes
        if spec.n_fft != self.config.n_fft {
            return Err(FrameError::ShapeMismatch {
                expected: self.config.n_fft,
                actual: spec.n_fft,
            });
        }
        let segments = ctx.try_map(&spec.frames, |bins| self.inverse_frame(bins))?;
        let win = self.config.frame.win_length();
        let hop = self.config.frame.hop_length();
        let n_frames = segments.len();
        if n_frames == 0 {
            return Ok(Vec::new());
        }

        let taps = self.config.window.as_slice();
        let floor = T::cast(MIN_ENVELOPE);
        let mut out = alloc::vec![T::ZERO; win + (n_frames - 1) * hop];
        ctx.for_each_chunk_mut(&mut out, hop, |chunk_index, chunk| {
            let start = chunk_index * hop;
            for (k, y) in chunk.iter_mut().enumerate() {
                let s = start + k;
                // frames i with i*hop <= s < i*hop + win
                let first = if s + 1 > win { (s + 1 - win).div_ceil(hop) } else { 0 };
                let last = (s / hop).min(n_frames - 1);
                let mut acc = T::ZERO;
                let mut envelope = T::ZERO;
                for (i, segment) in segments.iter().enumerate().take(last + 1).skip(first) {
                    let j = s - i * hop;
                    acc += segment[j];
                    envelope += taps[j] * taps[j];
                }
                *y = if envelope > floor { acc / envelope } else { acc };
            }
        });

        let p = self.config.frame.padding();
        let end = out.len().saturating_sub(p.right);
        if end <= p.left {
            return Ok(Vec::new());
        }
        out.truncate(end);
        out.drain(..p.left);
        log_trace!(
            "stft: synthesized {} frames into {} samples",
            n_frames,
            out.len()
        );
        Ok(out)
    }

    /// [`Stft::analyze`] for every signal in `batch`, one signal per task.
    pub fn analyze_batch(
        &self,
        ctx: &ExecContext,
        batch: &[Vec<T>],
    ) -> Result<Vec<Spectrogram<T>>, FrameError> {
        log_debug!(
            "stft: analyze_batch of {} signals on {} threads",
            batch.len(),
            ctx.threads()
        );
        ctx.try_map(batch, |audio| self.analyze(audio))
    }

    /// [`Stft::synthesize`] for every spectrogram in `batch`.
    pub fn synthesize_batch(
        &self,
        ctx: &ExecContext,
        batch: &[Spectrogram<T>],
    ) -> Result<Vec<Vec<T>>, FrameError> {
        log_debug!(
            "stft: synthesize_batch of {} spectrograms on {} threads",
            batch.len(),
            ctx.threads()
        );
        ctx.try_map(batch, |spec| self.synthesize(spec))
    }
}

/// One-shot forward transform.
pub fn stft<T: FftSample>(
    audio: &[T],
    config: &StftConfig<T>,
) -> Result<Spectrogram<T>, FrameError> {
    Stft::new(config.clone()).analyze(audio)
}

/// One-shot inverse transform.
pub fn istft<T: FftSample>(
    spec: &Spectrogram<T>,
    config: &StftConfig<T>,
) -> Result<Vec<T>, FrameError> {
    Stft::new(config.clone()).synthesize(spec)
}
