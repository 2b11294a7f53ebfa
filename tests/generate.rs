// Test intent: generated waveforms match reference periods and phase shifts.
use framewise::generate::{pulse_train, sawtooth, sine, square, Waveform};
use framewise::time::seconds_to_samples;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

const FREQUENCY: f64 = 1.0;
const SAMPLE_RATE: u32 = 8;
const SECONDS: f64 = 2.0;
/// Samples covered by a quarter-period phase offset at 1 Hz / 8 Hz.
const SAMPLE_OFFSET: usize = 2;

fn samples() -> usize {
    seconds_to_samples(SECONDS, SAMPLE_RATE) as usize
}

fn repeat(period: [f64; 8]) -> Vec<f64> {
    period.iter().chain(period.iter()).copied().collect()
}

fn rotate(x: &[f64], n: usize) -> Vec<f64> {
    x[n..].iter().chain(&x[..n]).copied().collect()
}

fn assert_close(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert!((x - y).abs() < 1e-6, "{a:?} vs {b:?}");
    }
}

fn check(shape: Waveform, expected: Vec<f64>) {
    let plain: Vec<f64> = shape.render(FREQUENCY, SAMPLE_RATE, samples(), 0.0);
    assert_close(&plain, &expected);
    let shifted: Vec<f64> = shape.render(FREQUENCY, SAMPLE_RATE, samples(), FRAC_PI_2);
    assert_close(&shifted, &rotate(&expected, SAMPLE_OFFSET));
}

#[test]
fn sine_wave() {
    let s = FRAC_1_SQRT_2;
    check(Waveform::Sine, repeat([0.0, s, 1.0, s, 0.0, -s, -1.0, -s]));
    let free: Vec<f64> = sine(FREQUENCY, SAMPLE_RATE, samples(), 0.0);
    assert_close(&free, &Waveform::Sine.render(FREQUENCY, SAMPLE_RATE, samples(), 0.0));
}

#[test]
fn square_wave() {
    check(
        Waveform::Square,
        repeat([1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0]),
    );
    let free: Vec<f64> = square(FREQUENCY, SAMPLE_RATE, 8, 0.0);
    assert_eq!(free.iter().filter(|&&v| v > 0.0).count(), 4);
}

#[test]
fn sawtooth_wave() {
    check(
        Waveform::Sawtooth,
        repeat([-1.0, -0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75]),
    );
    let free: Vec<f32> = sawtooth(FREQUENCY, SAMPLE_RATE, 4, 0.0);
    assert_eq!(free, [-1.0, -0.75, -0.5, -0.25]);
}

#[test]
fn pulse_train_wave() {
    check(
        Waveform::PulseTrain,
        repeat([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    );
    let free: Vec<f64> = pulse_train(FREQUENCY, SAMPLE_RATE, 16, PI);
    assert_eq!(free.iter().filter(|&&v| v == 1.0).count(), 2);
}
