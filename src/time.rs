//! Time quantities tied to a sample rate.
//!
//! [`TimeSpan`] is an immutable `{ sample_rate, samples }` pair. Durations in
//! seconds, milliseconds or as a period in hertz are derived from it on
//! demand. Adding or subtracting spans of different sample rates is an error
//! rather than a silent resample.

use core::ops::{Div, Mul};

use crate::error::FrameError;

/// Whole samples in `seconds`, truncated toward zero.
pub fn seconds_to_samples(seconds: f64, sample_rate: u32) -> i64 {
    (seconds * sample_rate as f64) as i64
}

pub fn samples_to_seconds(samples: i64, sample_rate: u32) -> f64 {
    samples as f64 / sample_rate as f64
}

pub fn milliseconds_to_samples(milliseconds: f64, sample_rate: u32) -> i64 {
    seconds_to_samples(milliseconds / 1000.0, sample_rate)
}

pub fn samples_to_milliseconds(samples: i64, sample_rate: u32) -> f64 {
    1000.0 * samples_to_seconds(samples, sample_rate)
}

/// Samples in one period of `hertz`.
pub fn hertz_to_samples(hertz: f64, sample_rate: u32) -> i64 {
    seconds_to_samples(1.0 / hertz, sample_rate)
}

/// Frequency whose period is `samples` long.
pub fn samples_to_hertz(samples: i64, sample_rate: u32) -> f64 {
    1.0 / samples_to_seconds(samples, sample_rate)
}

/// A signed number of samples at a fixed sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    sample_rate: u32,
    samples: i64,
}

impl TimeSpan {
    pub const fn from_samples(sample_rate: u32, samples: i64) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    pub fn from_seconds(sample_rate: u32, seconds: f64) -> Self {
        Self::from_samples(sample_rate, seconds_to_samples(seconds, sample_rate))
    }

    pub fn from_milliseconds(sample_rate: u32, milliseconds: f64) -> Self {
        Self::from_samples(
            sample_rate,
            milliseconds_to_samples(milliseconds, sample_rate),
        )
    }

    /// One period of `hertz`.
    pub fn from_hertz(sample_rate: u32, hertz: f64) -> Self {
        Self::from_samples(sample_rate, hertz_to_samples(hertz, sample_rate))
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn samples(&self) -> i64 {
        self.samples
    }

    pub fn seconds(&self) -> f64 {
        samples_to_seconds(self.samples, self.sample_rate)
    }

    pub fn milliseconds(&self) -> f64 {
        samples_to_milliseconds(self.samples, self.sample_rate)
    }

    /// Frequency whose period is this span.
    pub fn hertz(&self) -> f64 {
        samples_to_hertz(self.samples, self.sample_rate)
    }

    fn same_rate(&self, other: &TimeSpan) -> Result<(), FrameError> {
        if self.sample_rate != other.sample_rate {
            return Err(FrameError::MismatchedSampleRate {
                left: self.sample_rate,
                right: other.sample_rate,
            });
        }
        Ok(())
    }

    pub fn checked_add(self, other: TimeSpan) -> Result<TimeSpan, FrameError> {
        self.same_rate(&other)?;
        Ok(Self::from_samples(
            self.sample_rate,
            self.samples + other.samples,
        ))
    }

    pub fn checked_sub(self, other: TimeSpan) -> Result<TimeSpan, FrameError> {
        self.same_rate(&other)?;
        Ok(Self::from_samples(
            self.sample_rate,
            self.samples - other.samples,
        ))
    }
}

impl Mul<i64> for TimeSpan {
    type Output = TimeSpan;

    fn mul(self, rhs: i64) -> TimeSpan {
        TimeSpan::from_samples(self.sample_rate, self.samples * rhs)
    }
}

impl Mul<TimeSpan> for i64 {
    type Output = TimeSpan;

    fn mul(self, rhs: TimeSpan) -> TimeSpan {
        rhs * self
    }
}

/// Scales and truncates toward zero.
impl Mul<f64> for TimeSpan {
    type Output = TimeSpan;

    fn mul(self, rhs: f64) -> TimeSpan {
        TimeSpan::from_samples(self.sample_rate, (self.samples as f64 * rhs) as i64)
    }
}

/// Integer division, rounding toward zero. Panics on a zero divisor like
/// integer division does.
impl Div<i64> for TimeSpan {
    type Output = TimeSpan;

    fn div(self, rhs: i64) -> TimeSpan {
        TimeSpan::from_samples(self.sample_rate, self.samples / rhs)
    }
}
