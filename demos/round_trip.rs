//! Frame a tone three ways, then run it through the STFT and back.
use framewise::generate::sine;
use framewise::loudness::{impose_loudness, measure_loudness};
use framewise::{frame_count, CenterMode, FrameSpec, Stft, StftConfig};

fn main() {
    let sample_rate = 16000;
    let x: Vec<f64> = sine(440.0, sample_rate, sample_rate as usize, 0.0);

    for center in [CenterMode::Start, CenterMode::Hop, CenterMode::HalfHop] {
        let spec = FrameSpec::new(1024, 256, center, true).unwrap();
        println!(
            "center {} -> {} frames, padding {:?}",
            center.code(),
            frame_count(x.len(), &spec),
            spec.padding()
        );
    }

    let spec = FrameSpec::new(1024, 256, CenterMode::HalfHop, true).unwrap();
    let stft = Stft::new(StftConfig::new(spec));
    let y = stft.synthesize(&stft.analyze(&x).unwrap()).unwrap();
    let err = x
        .iter()
        .zip(&y)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f64, f64::max);
    println!("reconstructed {} samples, max error {err:e}", y.len());

    let quiet = impose_loudness(&y, -30.0);
    println!("loudness {:.2} dB", measure_loudness(&quiet));
}
