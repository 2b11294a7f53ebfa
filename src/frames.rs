//! Overlapping frames: padding, framing and frame-count accounting.
//!
//! [`pad`] and [`frame`] materialise the padded waveform; [`frame_count`]
//! predicts how many frames [`frame`] yields without touching any samples.
//! The two are kept in lock-step: a change to one needs the same change in
//! the other (`tests/frames.rs` checks the equality as a property).
//!
//! # Example
//! ```
//! use framewise::frames::{frame, frame_count, FrameSpec};
//! use framewise::padding::CenterMode;
//!
//! let x: Vec<f32> = (0..11).map(|i| i as f32).collect();
//! let spec = FrameSpec::new(5, 3, CenterMode::Start, true).unwrap();
//! let frames = frame(&x, &spec);
//! assert_eq!(frames.len(), 3);
//! assert_eq!(frames.get(1).unwrap(), &[3.0, 4.0, 5.0, 6.0, 7.0]);
//! assert_eq!(frame_count(x.len(), &spec), frames.len());
//! ```

use alloc::vec::Vec;
use core::iter::StepBy;
use core::slice::Windows;

use crate::error::FrameError;
use crate::num::Sample;
use crate::padding::{padding_for, reflect_pad, CenterMode, Padding};

/// Frame geometry plus the padding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSpec {
    win_length: usize,
    hop_length: usize,
    center: CenterMode,
    drop_incomplete_frame: bool,
}

impl FrameSpec {
    /// Validate and build a spec.
    ///
    /// Returns [`FrameError::InvalidFrameSpec`] if either length is zero or
    /// `hop_length > win_length`.
    pub fn new(
        win_length: usize,
        hop_length: usize,
        center: CenterMode,
        drop_incomplete_frame: bool,
    ) -> Result<Self, FrameError> {
        if win_length == 0 || hop_length == 0 || hop_length > win_length {
            return Err(FrameError::InvalidFrameSpec {
                win_length,
                hop_length,
            });
        }
        Ok(Self {
            win_length,
            hop_length,
            center,
            drop_incomplete_frame,
        })
    }

    /// Build a spec from the integer center code used in configuration.
    pub fn from_code(
        win_length: usize,
        hop_length: usize,
        center: u8,
        drop_incomplete_frame: bool,
    ) -> Result<Self, FrameError> {
        Self::new(
            win_length,
            hop_length,
            CenterMode::try_from(center)?,
            drop_incomplete_frame,
        )
    }

    pub fn with_center(mut self, center: CenterMode) -> Self {
        self.center = center;
        self
    }

    pub fn with_drop_incomplete_frame(mut self, drop_incomplete_frame: bool) -> Self {
        self.drop_incomplete_frame = drop_incomplete_frame;
        self
    }

    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    #[inline]
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    #[inline]
    pub fn center(&self) -> CenterMode {
        self.center
    }

    #[inline]
    pub fn drop_incomplete_frame(&self) -> bool {
        self.drop_incomplete_frame
    }

    /// Padding amounts for this spec (independent of `drop_incomplete_frame`).
    #[inline]
    pub fn padding(&self) -> Padding {
        padding_for(self.win_length, self.hop_length, self.center)
    }

    /// Offset of frame `index` in the coordinates of the unpadded waveform.
    /// Negative for frames that start inside the left padding.
    pub fn frame_offset(&self, index: usize) -> isize {
        (index * self.hop_length) as isize - self.padding().left as isize
    }
}

/// Number of frames [`frame`] produces for `nsamples` input samples.
///
/// `padded = nsamples + pad_left + pad_right`, then
/// `(padded - (win_length - hop_length)) / hop_length`, floored when the
/// incomplete trailing frame is dropped and ceiled otherwise, never below 0.
pub fn frame_count(nsamples: usize, spec: &FrameSpec) -> usize {
    let padded = (nsamples + spec.padding().total()) as i64;
    let hop = spec.hop_length as i64;
    let raw = padded - (spec.win_length as i64 - hop);
    let n = if spec.drop_incomplete_frame {
        raw.div_euclid(hop)
    } else {
        (raw + hop - 1).div_euclid(hop)
    };
    n.max(0) as usize
}

/// [`frame_count`] for a batch of signal lengths.
pub fn frame_counts(lengths: &[usize], spec: &FrameSpec) -> Vec<usize> {
    lengths.iter().map(|&n| frame_count(n, spec)).collect()
}

/// Length of the buffer [`pad`] returns for `nsamples` input samples.
pub fn padded_len(nsamples: usize, spec: &FrameSpec) -> usize {
    let len = nsamples + spec.padding().total();
    if spec.drop_incomplete_frame && len >= spec.win_length {
        len - (len - spec.win_length) % spec.hop_length
    } else {
        len
    }
}

/// Reflect-pad `audio` for framing.
///
/// When `drop_incomplete_frame` is set, the right tail is trimmed so the
/// padded length is exactly `win_length + k * hop_length`. A padded signal
/// shorter than one frame is returned untrimmed.
pub fn pad<T: Sample>(audio: &[T], spec: &FrameSpec) -> Vec<T> {
    let p = spec.padding();
    let mut out = reflect_pad(audio, p.left, p.right);
    if spec.drop_incomplete_frame && out.len() >= spec.win_length {
        let excess = (out.len() - spec.win_length) % spec.hop_length;
        out.truncate(out.len() - excess);
    }
    log_trace!(
        "pad: {} samples -> {} (left={}, right={}, center={:?})",
        audio.len(),
        out.len(),
        p.left,
        p.right,
        spec.center
    );
    out
}

/// Zero-extend a padded buffer whose tail holds a partial frame.
fn complete_last_frame<T: Sample>(buffer: &mut Vec<T>, win_length: usize, hop_length: usize) {
    let len = buffer.len();
    let target = if len >= win_length {
        let rem = (len - win_length) % hop_length;
        if rem == 0 {
            return;
        }
        len + hop_length - rem
    } else if len + hop_length > win_length {
        win_length
    } else {
        return;
    };
    buffer.resize(target, T::ZERO);
}

/// Pad `audio` and view it as overlapping frames.
///
/// With `drop_incomplete_frame = false` a trailing partial frame is kept and
/// zero-filled to `win_length`.
pub fn frame<T: Sample>(audio: &[T], spec: &FrameSpec) -> FrameSet<T> {
    let mut buffer = pad(audio, spec);
    if !spec.drop_incomplete_frame {
        complete_last_frame(&mut buffer, spec.win_length, spec.hop_length);
    }
    FrameSet {
        buffer,
        win_length: spec.win_length,
        hop_length: spec.hop_length,
    }
}

/// Owned padded audio viewed as frames of `win_length` at stride
/// `hop_length`. Frames borrow from the single padded buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSet<T> {
    buffer: Vec<T>,
    win_length: usize,
    hop_length: usize,
}

impl<T: Sample> FrameSet<T> {
    /// Number of complete frames that fit the padded buffer.
    pub fn len(&self) -> usize {
        if self.buffer.len() < self.win_length {
            0
        } else {
            (self.buffer.len() - self.win_length) / self.hop_length + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    #[inline]
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Frame `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&[T]> {
        let start = index.checked_mul(self.hop_length)?;
        self.buffer.get(start..start.checked_add(self.win_length)?)
    }

    pub fn iter(&self) -> StepBy<Windows<'_, T>> {
        self.buffer.windows(self.win_length).step_by(self.hop_length)
    }

    /// The padded waveform the frames are cut from.
    pub fn padded(&self) -> &[T] {
        &self.buffer
    }

    /// Copy the frames out into a `frames x win_length` matrix.
    pub fn to_vecs(&self) -> Vec<Vec<T>> {
        self.iter().map(|f| f.to_vec()).collect()
    }
}

impl<'a, T: Sample> IntoIterator for &'a FrameSet<T> {
    type Item = &'a [T];
    type IntoIter = StepBy<Windows<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn rejects_invalid_geometry() {
        for (win, hop) in [(0, 1), (4, 0), (4, 5)] {
            assert_eq!(
                FrameSpec::new(win, hop, CenterMode::Start, true),
                Err(FrameError::InvalidFrameSpec {
                    win_length: win,
                    hop_length: hop
                })
            );
        }
        assert_eq!(
            FrameSpec::from_code(4, 2, 9, true),
            Err(FrameError::InvalidCenterMode(9))
        );
    }

    #[test]
    fn known_decomposition_start() {
        let spec = FrameSpec::new(5, 3, CenterMode::Start, true).unwrap();
        let frames = frame(&ramp(11), &spec);
        assert_eq!(
            frames.to_vecs(),
            vec![
                vec![0.0, 1.0, 2.0, 3.0, 4.0],
                vec![3.0, 4.0, 5.0, 6.0, 7.0],
                vec![6.0, 7.0, 8.0, 9.0, 10.0],
            ]
        );
    }

    #[test]
    fn known_decomposition_hop_centered() {
        let spec = FrameSpec::new(5, 3, CenterMode::Hop, true).unwrap();
        let frames = frame(&ramp(12), &spec);
        assert_eq!(
            frames.to_vecs(),
            vec![
                vec![2.0, 1.0, 0.0, 1.0, 2.0],
                vec![1.0, 2.0, 3.0, 4.0, 5.0],
                vec![4.0, 5.0, 6.0, 7.0, 8.0],
                vec![7.0, 8.0, 9.0, 10.0, 11.0],
            ]
        );
    }

    #[test]
    fn known_decomposition_half_hop() {
        let spec = FrameSpec::new(5, 3, CenterMode::HalfHop, true).unwrap();
        let frames = frame(&ramp(11), &spec);
        assert_eq!(
            frames.to_vecs(),
            vec![
                vec![1.0, 0.0, 1.0, 2.0, 3.0],
                vec![2.0, 3.0, 4.0, 5.0, 6.0],
                vec![5.0, 6.0, 7.0, 8.0, 9.0],
            ]
        );
    }

    #[test]
    fn incomplete_frame_is_zero_filled() {
        let spec = FrameSpec::new(5, 3, CenterMode::Start, false).unwrap();
        let frames = frame(&ramp(12), &spec);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames.get(3).unwrap(), &[9.0, 10.0, 11.0, 0.0, 0.0]);
        assert_eq!(frame_count(12, &spec), 4);
    }

    #[test]
    fn short_signal_frame_counts() {
        let drop = FrameSpec::new(5, 3, CenterMode::Start, true).unwrap();
        let keep = drop.with_drop_incomplete_frame(false);
        assert_eq!(frame(&ramp(4), &drop).len(), 0);
        assert_eq!(frame_count(4, &drop), 0);
        // 3 samples exceed win - hop = 2, so one zero-filled frame remains
        assert_eq!(frame(&ramp(3), &keep).len(), 1);
        assert_eq!(frame_count(3, &keep), 1);
        assert_eq!(frame(&ramp(2), &keep).len(), 0);
        assert_eq!(frame_count(2, &keep), 0);
        assert_eq!(frame_count(0, &keep), 0);
    }

    #[test]
    fn padded_len_matches_pad() {
        let spec = FrameSpec::new(8, 3, CenterMode::Hop, true).unwrap();
        for n in 0..40 {
            assert_eq!(pad(&ramp(n), &spec).len(), padded_len(n, &spec), "n={n}");
        }
    }

    #[test]
    fn frame_offsets_follow_padding() {
        let spec = FrameSpec::new(5, 3, CenterMode::Hop, true).unwrap();
        assert_eq!(spec.frame_offset(0), -2);
        assert_eq!(spec.frame_offset(2), 4);
    }

    #[test]
    fn get_out_of_range_is_none() {
        let spec = FrameSpec::new(4, 2, CenterMode::Start, true).unwrap();
        let frames = frame(&ramp(8), &spec);
        assert_eq!(frames.len(), 3);
        assert!(frames.get(3).is_none());
        assert_eq!(frames.iter().count(), 3);
        assert_eq!(frames.padded().len(), 8);
    }
}
