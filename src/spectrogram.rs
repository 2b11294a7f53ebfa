//! Spectrogram feature extraction.
//!
//! [`FeatureExtractor`] bundles an [`Stft`], an output representation and an
//! optional mel projection, and turns waveforms into per-frame feature rows.

use alloc::vec::Vec;

use crate::error::FrameError;
use crate::exec::ExecContext;
use crate::loudness::{amplitude_to_db, DEFAULT_DB_FLOOR};
use crate::mel::MelFilterbank;
use crate::stft::{FftSample, Spectrogram, Stft, StftConfig};

/// Output representation of [`FeatureExtractor::extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpectrogramKind {
    /// Raw complex spectra.
    Complex,
    /// `|X|`
    #[default]
    Magnitude,
    /// `ln(|X|)`
    Log,
    /// `(ln(|X|) + 5) / 5`
    LogNorm,
    /// `|X|^2`
    Power,
    /// `20 log10(|X|)`, floored at [`DEFAULT_DB_FLOOR`].
    Decibel,
}

/// Extracted features for one waveform.
#[derive(Debug, Clone, PartialEq)]
pub enum Features<T> {
    Complex(Spectrogram<T>),
    /// `frames x rows`.
    Real(Vec<Vec<T>>),
}

impl<T> Features<T> {
    pub fn n_frames(&self) -> usize {
        match self {
            Features::Complex(s) => s.frames.len(),
            Features::Real(rows) => rows.len(),
        }
    }
}

/// Waveform to spectrogram features at a fixed sample rate.
#[derive(Debug, Clone)]
pub struct FeatureExtractor<T: FftSample> {
    sample_rate: u32,
    stft: Stft<T>,
    kind: SpectrogramKind,
    mel: Option<MelFilterbank<T>>,
}

impl<T: FftSample> FeatureExtractor<T> {
    /// Magnitude features with no mel projection.
    pub fn new(sample_rate: u32, config: StftConfig<T>) -> Self {
        Self {
            sample_rate,
            stft: Stft::new(config),
            kind: SpectrogramKind::default(),
            mel: None,
        }
    }

    pub fn with_kind(mut self, kind: SpectrogramKind) -> Result<Self, FrameError> {
        if kind == SpectrogramKind::Complex && self.mel.is_some() {
            return Err(FrameError::InvalidConfig(
                "complex output cannot be mel-projected",
            ));
        }
        self.kind = kind;
        Ok(self)
    }

    /// Project magnitudes onto `n_mels` Slaney filters over `fmin..fmax`.
    pub fn with_mel(
        mut self,
        n_mels: usize,
        fmin: f64,
        fmax: Option<f64>,
    ) -> Result<Self, FrameError> {
        if self.kind == SpectrogramKind::Complex {
            return Err(FrameError::InvalidConfig(
                "complex output cannot be mel-projected",
            ));
        }
        self.mel = Some(MelFilterbank::new(
            self.sample_rate,
            self.stft.config().n_fft(),
            n_mels,
            fmin,
            fmax,
        )?);
        Ok(self)
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn kind(&self) -> SpectrogramKind {
        self.kind
    }

    #[inline]
    pub fn stft(&self) -> &Stft<T> {
        &self.stft
    }

    /// Rows per frame: `n_mels` with a mel projection, else `n_fft / 2 + 1`.
    pub fn n_rows(&self) -> usize {
        match &self.mel {
            Some(mel) => mel.n_mels(),
            None => self.stft.config().n_bins(),
        }
    }

    /// Frames [`FeatureExtractor::extract`] yields for `nsamples` samples.
    pub fn frame_count(&self, nsamples: usize) -> usize {
        self.stft.frame_count(nsamples)
    }

    pub fn extract(&self, audio: &[T]) -> Result<Features<T>, FrameError> {
        self.extract_with(&ExecContext::serial(), audio)
    }

    /// [`FeatureExtractor::extract`] with per-frame work on `ctx`.
    pub fn extract_with(&self, ctx: &ExecContext, audio: &[T]) -> Result<Features<T>, FrameError> {
        let spec = self.stft.analyze_with(ctx, audio)?;
        if self.kind == SpectrogramKind::Complex {
            return Ok(Features::Complex(spec));
        }
        let mut rows = spec.magnitudes();
        if let Some(mel) = &self.mel {
            rows = ctx.try_map(&rows, |frame| mel.apply(frame))?;
        }
        let kind = self.kind;
        for row in rows.iter_mut() {
            for x in row.iter_mut() {
                *x = scale(kind, *x);
            }
        }
        Ok(Features::Real(rows))
    }

    /// [`FeatureExtractor::extract`] over a batch of waveforms.
    pub fn extract_batch(
        &self,
        ctx: &ExecContext,
        batch: &[Vec<T>],
    ) -> Result<Vec<Features<T>>, FrameError> {
        ctx.try_map(batch, |audio| self.extract(audio))
    }
}

#[inline]
fn scale<T: FftSample>(kind: SpectrogramKind, magnitude: T) -> T {
    match kind {
        SpectrogramKind::Complex | SpectrogramKind::Magnitude => magnitude,
        SpectrogramKind::Log => magnitude.ln(),
        SpectrogramKind::LogNorm => (magnitude.ln() + T::cast(5.0)) / T::cast(5.0),
        SpectrogramKind::Power => magnitude * magnitude,
        SpectrogramKind::Decibel => amplitude_to_db(magnitude),
    }
}
