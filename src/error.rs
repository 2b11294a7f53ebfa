//! Error type shared by every module.

use core::fmt;

/// Configuration and shape errors.
///
/// Every variant describes a caller mistake detected synchronously at the
/// point where the precondition is checked; none of them are transient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameError {
    /// `win_length` or `hop_length` is zero, or `hop_length > win_length`.
    InvalidFrameSpec { win_length: usize, hop_length: usize },
    /// Center mode code outside `{0, 1, 2}`.
    InvalidCenterMode(u8),
    /// A buffer (window, spectrum, frame) has the wrong length.
    ShapeMismatch { expected: usize, actual: usize },
    /// Arithmetic between time spans sampled at different rates.
    MismatchedSampleRate { left: u32, right: u32 },
    /// Mutually exclusive or out-of-range options.
    InvalidConfig(&'static str),
    /// The FFT backend rejected its input.
    Fft,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::InvalidFrameSpec {
                win_length,
                hop_length,
            } => write!(
                f,
                "invalid frame spec: win_length={win_length}, hop_length={hop_length} \
                 (both must be positive and hop_length <= win_length)"
            ),
            FrameError::InvalidCenterMode(code) => {
                write!(f, "unexpected center mode {code}, expected 0, 1 or 2")
            }
            FrameError::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected length {expected}, got {actual}")
            }
            FrameError::MismatchedSampleRate { left, right } => {
                write!(f, "sample rates must match: {left} Hz vs {right} Hz")
            }
            FrameError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            FrameError::Fft => f.write_str("FFT backend rejected the input"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}
