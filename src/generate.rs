//! Periodic test waveforms.
//!
//! Sample `i` sits at angle `2π f (i + dither) / sample_rate + angle_offset`.
//! Sine and sawtooth are evaluated at the sample instant (`dither = 0`);
//! square and pulse waves count samples and are evaluated half a sample later
//! (`dither = 0.5`) so each period holds the same number of high and low
//! samples.
//!
//! ```
//! use framewise::generate::square;
//!
//! let w: Vec<f32> = square(1.0, 8, 8, 0.0);
//! assert_eq!(w, [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0]);
//! ```

use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::num::Sample;

/// Waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    /// One high sample per period.
    PulseTrain,
}

impl Waveform {
    /// Sub-sample offset at which the shape is evaluated.
    pub fn dither(self) -> f64 {
        match self {
            Waveform::Sine | Waveform::Sawtooth => 0.0,
            Waveform::Square | Waveform::PulseTrain => 0.5,
        }
    }

    /// `samples` samples of this shape.
    pub fn render<T: Sample>(
        self,
        frequency: f64,
        sample_rate: u32,
        samples: usize,
        angle_offset: f64,
    ) -> Vec<T> {
        let step = frequency / sample_rate as f64;
        let dither = self.dither();
        (0..samples)
            .map(|i| {
                let p = phase(i, step, dither, angle_offset);
                let v = match self {
                    Waveform::Sine => libm::sin(2.0 * PI * p),
                    Waveform::Square => {
                        if p >= 0.5 {
                            -1.0
                        } else {
                            1.0
                        }
                    }
                    Waveform::Sawtooth => 2.0 * p - 1.0,
                    Waveform::PulseTrain => {
                        if p < step {
                            1.0
                        } else {
                            0.0
                        }
                    }
                };
                T::cast(v)
            })
            .collect()
    }
}

/// Position of sample `i` within its cycle, in `[0, 1)`.
#[inline]
fn phase(i: usize, step: f64, dither: f64, angle_offset: f64) -> f64 {
    let cycles = (i as f64 + dither) * step + angle_offset / (2.0 * PI);
    let p = cycles - libm::floor(cycles);
    if p >= 1.0 {
        0.0
    } else {
        p
    }
}

/// Angle of every sample, before wrapping.
pub fn wave_angles<T: Sample>(
    frequency: f64,
    sample_rate: u32,
    samples: usize,
    angle_offset: f64,
    dither: f64,
) -> Vec<T> {
    let k = 2.0 * PI * frequency / sample_rate as f64;
    (0..samples)
        .map(|i| T::cast((i as f64 + dither) * k + angle_offset))
        .collect()
}

pub fn sine<T: Sample>(frequency: f64, sample_rate: u32, samples: usize, angle_offset: f64) -> Vec<T> {
    Waveform::Sine.render(frequency, sample_rate, samples, angle_offset)
}

/// `+1` for the first half of each period, `-1` for the second.
pub fn square<T: Sample>(
    frequency: f64,
    sample_rate: u32,
    samples: usize,
    angle_offset: f64,
) -> Vec<T> {
    Waveform::Square.render(frequency, sample_rate, samples, angle_offset)
}

/// Rises linearly from `-1` to just below `+1` every period.
pub fn sawtooth<T: Sample>(
    frequency: f64,
    sample_rate: u32,
    samples: usize,
    angle_offset: f64,
) -> Vec<T> {
    Waveform::Sawtooth.render(frequency, sample_rate, samples, angle_offset)
}

pub fn pulse_train<T: Sample>(
    frequency: f64,
    sample_rate: u32,
    samples: usize,
    angle_offset: f64,
) -> Vec<T> {
    Waveform::PulseTrain.render(frequency, sample_rate, samples, angle_offset)
}
