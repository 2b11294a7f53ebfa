//! # framewise - overlapping frames, STFT and loudness for audio
//!
//! Turns waveforms into overlapping, padded analysis frames and back. The same
//! frame grid drives a short-time Fourier transform with exact overlap-add
//! reconstruction, per-frame level contours, and a set of amplitude,
//! intensity and decibel conversions that stay finite on silent audio.
//!
//! ## Features
//!
//! - **Three centering conventions** (`0`: frames start at `n * hop`, `1`:
//!   frames centered on `n * hop`, `2`: frames centered on `(n + 0.5) * hop`)
//!   with reflective padding
//! - **Frame counting** without touching the samples, always equal to what the
//!   framer produces
//! - **STFT/ISTFT** on top of `realfft`, reconstructing to within floating
//!   point tolerance
//! - **Level contours and loudness** normalisation with epsilon-guarded
//!   square roots and floored decibels
//! - **Batch processing** on an explicit [`ExecContext`], serial or on a rayon
//!   pool
//! - `no_std` + `alloc` core (framing, levels, loudness, generators)
//!
//! ## Cargo Features
//!
//! - `std` (default): spectral path (`stft`, `spectrogram`, `mel`)
//! - `parallel`: rayon thread pool for [`ExecContext`]; size from
//!   `FRAMEWISE_THREADS` or the number of cores
//! - `verbose-logging`: `log` records from framing and transform paths
//!
//! ## Example
//!
//! ```
//! use framewise::{frame, frame_count, CenterMode, FrameSpec};
//!
//! let audio = vec![0.0f32; 1000];
//! let spec = FrameSpec::new(256, 64, CenterMode::HalfHop, true).unwrap();
//! let frames = frame(&audio, &spec);
//! assert_eq!(frames.len(), frame_count(audio.len(), &spec));
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

#[cfg(feature = "verbose-logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "verbose-logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Float abstraction shared by every numeric routine.
pub mod num;

pub mod error;

/// Padding policy for the three center modes and the reflect primitive.
pub mod padding;

/// Framing and frame counting.
pub mod frames;

/// Analysis/synthesis windows, default trimmed Hann.
pub mod window;

/// Serial or thread-pool execution for batch and per-frame work.
pub mod exec;

/// Per-frame magnitude and RMS contours.
pub mod level;

/// Amplitude, intensity and decibel scales.
pub mod loudness;

/// Short-Time Fourier Transform (STFT)
///
/// Analysis and overlap-add synthesis on a shared frame grid.
#[cfg(feature = "std")]
pub mod stft;

/// Spectrogram features: magnitude, log, power, decibel, mel.
#[cfg(feature = "std")]
pub mod spectrogram;

#[cfg(feature = "std")]
pub mod mel;

/// Sine, square, sawtooth and pulse generators.
pub mod generate;

/// Sample-rate-aware time spans.
pub mod time;

pub use error::FrameError;
pub use exec::ExecContext;
pub use frames::{frame, frame_count, pad, FrameSet, FrameSpec};
pub use loudness::Guard;
pub use num::Sample;
pub use padding::{padding_for, CenterMode, Padding};
pub use window::Window;

#[cfg(feature = "std")]
pub use realfft::num_complex::Complex;
#[cfg(feature = "std")]
pub use stft::{istft, stft, Spectrogram, Stft, StftConfig};
