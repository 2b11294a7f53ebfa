//! Padding policy for overlapping frames.
//!
//! The center mode decides how much of the waveform is mirrored onto each side
//! before framing:
//!
//! - [`CenterMode::Start`] (`0`): frame `n` starts at sample `n * hop_length`.
//!   Same as `center=False` in librosa.
//! - [`CenterMode::Hop`] (`1`): frame `n` is centered over sample
//!   `n * hop_length`, which takes `win_length / 2` samples of padding on both
//!   sides. Same as `center=True` in librosa.
//! - [`CenterMode::HalfHop`] (`2`): frame `n` is centered over
//!   `(n + 0.5) * hop_length`, so every frame stands for exactly `hop_length`
//!   waveform samples (leftover samples on the right tail are excluded).
//!
//! # Example
//! ```
//! use framewise::padding::{padding_for, CenterMode, Padding};
//!
//! let p = padding_for(5, 3, CenterMode::HalfHop);
//! assert_eq!(p, Padding { left: 1, right: 1 });
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::error::FrameError;
use crate::num::Sample;

/// Framing convention, see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CenterMode {
    Start = 0,
    Hop = 1,
    #[default]
    HalfHop = 2,
}

impl CenterMode {
    /// Integer code used by configuration files and the CLI.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CenterMode {
    type Error = FrameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CenterMode::Start),
            1 => Ok(CenterMode::Hop),
            2 => Ok(CenterMode::HalfHop),
            other => Err(FrameError::InvalidCenterMode(other)),
        }
    }
}

/// Samples added on each side of the waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Padding {
    pub left: usize,
    pub right: usize,
}

impl Padding {
    #[inline]
    pub fn total(self) -> usize {
        self.left + self.right
    }
}

/// Padding amounts for a frame geometry.
///
/// `hop_length` must not exceed `win_length`; [`crate::frames::FrameSpec`]
/// enforces that before calling here. Saturates to zero otherwise.
pub fn padding_for(win_length: usize, hop_length: usize, center: CenterMode) -> Padding {
    match center {
        CenterMode::Start => Padding { left: 0, right: 0 },
        CenterMode::Hop => Padding {
            left: win_length / 2,
            right: win_length / 2,
        },
        CenterMode::HalfHop => {
            let d = win_length.saturating_sub(hop_length);
            Padding {
                left: d / 2,
                right: d - d / 2,
            }
        }
    }
}

/// [`padding_for`] taking the integer center code.
pub fn padding_for_code(
    win_length: usize,
    hop_length: usize,
    center: u8,
) -> Result<Padding, FrameError> {
    Ok(padding_for(
        win_length,
        hop_length,
        CenterMode::try_from(center)?,
    ))
}

/// Map a virtual index (negative or past the end) back into `0..len` by
/// mirroring around the edge samples without repeating them.
#[inline]
fn reflect_index(j: isize, len: usize) -> usize {
    debug_assert!(len >= 2);
    let period = 2 * (len as isize - 1);
    let m = j.rem_euclid(period);
    if m >= len as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}

/// Reflect-pad `signal` with `left` and `right` mirrored samples.
///
/// The edge sample itself is not repeated:
/// `[a, b, c, d]` padded by 2 on both sides becomes
/// `[c, b, a, b, c, d, c, b]`. Pads longer than the signal keep folding.
/// A single sample is replicated and an empty signal is padded with zeros.
pub fn reflect_pad<T: Sample>(signal: &[T], left: usize, right: usize) -> Vec<T> {
    let n = signal.len();
    if n == 0 {
        return vec![T::ZERO; left + right];
    }
    let mut out = Vec::with_capacity(left + n + right);
    if n == 1 {
        out.resize(left + 1 + right, signal[0]);
        return out;
    }
    for j in -(left as isize)..0 {
        out.push(signal[reflect_index(j, n)]);
    }
    out.extend_from_slice(signal);
    for j in n as isize..(n + right) as isize {
        out.push(signal[reflect_index(j, n)]);
    }
    out
}
