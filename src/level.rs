//! Per-frame level contours.
//!
//! Both contours frame the signal with a [`FrameSpec`], weight every frame by
//! a window (the trimmed Hann window unless one is supplied) and undo the
//! window's level bias so a constant signal reads as its own magnitude.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::error::FrameError;
use crate::exec::ExecContext;
use crate::frames::{frame, FrameSpec};
use crate::loudness::{intensity_to_amplitude, Guard};
use crate::num::Sample;
use crate::window::Window;

fn resolve_window<'a, T: Sample>(
    window: Option<&'a Window<T>>,
    win_length: usize,
) -> Result<Cow<'a, Window<T>>, FrameError> {
    let w = match window {
        Some(w) => {
            w.check_len(win_length)?;
            Cow::Borrowed(w)
        }
        None => Cow::Owned(Window::trimmed_hann(win_length)),
    };
    if w.mean() == T::ZERO {
        return Err(FrameError::InvalidConfig("window has zero mean"));
    }
    Ok(w)
}

/// Mean absolute windowed amplitude per frame, divided by the window mean.
///
/// Silence gives exactly `0` in every frame.
pub fn magnitude_contour<T: Sample>(
    audio: &[T],
    spec: &FrameSpec,
    window: Option<&Window<T>>,
) -> Result<Vec<T>, FrameError> {
    let w = resolve_window(window, spec.win_length())?;
    let norm = w.mean() * T::cast_usize(spec.win_length());
    let frames = frame(audio, spec);
    Ok(frames
        .iter()
        .map(|f| {
            let mut acc = T::ZERO;
            for (&x, &wi) in f.iter().zip(w.as_slice()) {
                acc += (x * wi).fabs();
            }
            acc / norm
        })
        .collect())
}

/// Root mean square windowed amplitude per frame, divided by the window mean.
///
/// The square root goes through `guard`; with the default
/// [`Guard::Epsilon`] silence gives exactly `0` and the result stays
/// differentiable around it.
pub fn rms_contour<T: Sample>(
    audio: &[T],
    spec: &FrameSpec,
    window: Option<&Window<T>>,
    guard: Guard<T>,
) -> Result<Vec<T>, FrameError> {
    let w = resolve_window(window, spec.win_length())?;
    let wmean = w.mean();
    let n = T::cast_usize(spec.win_length());
    let frames = frame(audio, spec);
    Ok(frames
        .iter()
        .map(|f| {
            let mut acc = T::ZERO;
            for (&x, &wi) in f.iter().zip(w.as_slice()) {
                let v = x * wi;
                acc += v * v;
            }
            intensity_to_amplitude(acc / n, guard) / wmean
        })
        .collect())
}

/// [`magnitude_contour`] over a batch of signals.
pub fn magnitude_contour_batch<T: Sample>(
    ctx: &ExecContext,
    batch: &[Vec<T>],
    spec: &FrameSpec,
    window: Option<&Window<T>>,
) -> Result<Vec<Vec<T>>, FrameError> {
    log_debug!(
        "magnitude_contour_batch: {} signals on {} threads",
        batch.len(),
        ctx.threads()
    );
    ctx.try_map(batch, |audio| magnitude_contour(audio, spec, window))
}

/// [`rms_contour`] over a batch of signals.
pub fn rms_contour_batch<T: Sample>(
    ctx: &ExecContext,
    batch: &[Vec<T>],
    spec: &FrameSpec,
    window: Option<&Window<T>>,
    guard: Guard<T>,
) -> Result<Vec<Vec<T>>, FrameError> {
    log_debug!(
        "rms_contour_batch: {} signals on {} threads",
        batch.len(),
        ctx.threads()
    );
    ctx.try_map(batch, |audio| rms_contour(audio, spec, window, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::frame_count;
    use crate::padding::CenterMode;
    use alloc::vec;

    fn spec() -> FrameSpec {
        FrameSpec::new(8, 4, CenterMode::HalfHop, true).unwrap()
    }

    #[test]
    fn silence_is_exactly_zero() {
        let x = vec![0.0f64; 64];
        let m = magnitude_contour(&x, &spec(), None).unwrap();
        let r = rms_contour(&x, &spec(), None, Guard::default()).unwrap();
        assert_eq!(m.len(), frame_count(64, &spec()));
        assert!(m.iter().all(|&v| v == 0.0));
        assert!(r.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn tiny_signal_stays_finite() {
        let x = vec![1e-30f32; 64];
        let r = rms_contour(&x, &spec(), None, Guard::default()).unwrap();
        assert!(r.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn constant_signal_reads_its_magnitude() {
        let x = vec![-0.5f64; 64];
        let rect = Window::rectangular(8);
        let m = magnitude_contour(&x, &spec(), Some(&rect)).unwrap();
        let r = rms_contour(&x, &spec(), Some(&rect), Guard::Exact).unwrap();
        for (a, b) in m.iter().zip(&r) {
            assert!((a - 0.5).abs() < 1e-12);
            assert!((b - 0.5).abs() < 1e-12);
        }
        // trimmed Hann normalisation is exact for magnitude of a constant
        let m = magnitude_contour(&x, &spec(), None).unwrap();
        assert!(m.iter().all(|v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn window_length_is_checked() {
        let w = Window::<f32>::rectangular(5);
        assert_eq!(
            magnitude_contour(&[0.0f32; 16], &spec(), Some(&w)),
            Err(FrameError::ShapeMismatch {
                expected: 8,
                actual: 5
            })
        );
        let zero = Window::from_taps(vec![0.0f32; 8]);
        assert!(rms_contour(&[0.0f32; 16], &spec(), Some(&zero), Guard::Exact).is_err());
    }

    #[test]
    fn batch_matches_single() {
        let batch = vec![
            (0..40).map(|i| (i as f64 * 0.3).sin()).collect::<Vec<_>>(),
            vec![0.25; 20],
        ];
        let ctx = ExecContext::serial();
        let out = rms_contour_batch(&ctx, &batch, &spec(), None, Guard::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[1],
            rms_contour(&batch[1], &spec(), None, Guard::default()).unwrap()
        );
        let mags = magnitude_contour_batch(&ctx, &batch, &spec(), None).unwrap();
        assert_eq!(mags[0].len(), frame_count(40, &spec()));
    }
}
