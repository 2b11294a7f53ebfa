// Test intent: the thread-pool context produces the same results as serial.
#![cfg(feature = "parallel")]

use framewise::exec::ExecContext;
use framewise::frames::FrameSpec;
use framewise::level::{magnitude_contour_batch, rms_contour_batch};
use framewise::loudness::Guard;
use framewise::padding::CenterMode;
use framewise::spectrogram::{FeatureExtractor, SpectrogramKind};
use framewise::stft::{Stft, StftConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Worker count used for the pool under test.
const THREADS: usize = 4;

fn batch(n: usize, len: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(99);
    (0..n)
        .map(|_| (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

fn stft() -> Stft<f64> {
    let frame = FrameSpec::new(512, 128, CenterMode::HalfHop, true).unwrap();
    Stft::new(StftConfig::new(frame))
}

/// Per-frame FFTs and chunked overlap-add on the pool match the serial path.
#[test]
fn per_frame_parallel_matches_serial() {
    let pool = ExecContext::parallel(THREADS).unwrap();
    let serial = ExecContext::serial();
    let x = &batch(1, 128 * 64)[0];
    let stft = stft();
    let a = stft.analyze_with(&serial, x).unwrap();
    let b = stft.analyze_with(&pool, x).unwrap();
    assert_eq!(a, b);
    let ya = stft.synthesize_with(&serial, &a).unwrap();
    let yb = stft.synthesize_with(&pool, &b).unwrap();
    assert_eq!(ya, yb);
    for (s, r) in x.iter().zip(&yb) {
        assert!((s - r).abs() < 1e-6);
    }
}

/// Batch entry points keep item order.
#[test]
fn batch_parallel_matches_serial() {
    let pool = ExecContext::parallel(THREADS).unwrap();
    let serial = ExecContext::serial();
    let items = batch(8, 3000);
    let stft = stft();
    assert_eq!(
        stft.analyze_batch(&pool, &items).unwrap(),
        stft.analyze_batch(&serial, &items).unwrap()
    );
    let spec = FrameSpec::new(256, 64, CenterMode::Hop, false).unwrap();
    assert_eq!(
        rms_contour_batch(&pool, &items, &spec, None, Guard::default()).unwrap(),
        rms_contour_batch(&serial, &items, &spec, None, Guard::default()).unwrap()
    );
    assert_eq!(
        magnitude_contour_batch(&pool, &items, &spec, None).unwrap(),
        magnitude_contour_batch(&serial, &items, &spec, None).unwrap()
    );
}

/// Mel features computed on the pool match the serial ones.
#[test]
fn features_parallel_matches_serial() {
    let frame = FrameSpec::new(512, 128, CenterMode::HalfHop, true).unwrap();
    let fx = FeatureExtractor::new(16000, StftConfig::new(frame))
        .with_kind(SpectrogramKind::Decibel)
        .unwrap()
        .with_mel(40, 0.0, None)
        .unwrap();
    let items = batch(3, 4000);
    let pool = ExecContext::parallel(THREADS).unwrap();
    assert_eq!(
        fx.extract_batch(&pool, &items).unwrap(),
        fx.extract_batch(&ExecContext::serial(), &items).unwrap()
    );
    assert_eq!(
        fx.extract_with(&pool, &items[0]).unwrap(),
        fx.extract(&items[0]).unwrap()
    );
}

#[test]
fn zero_threads_is_rejected() {
    assert!(ExecContext::parallel(0).is_err());
    assert_eq!(ExecContext::parallel(3).unwrap().threads(), 3);
}
