//! Demonstrates enabling verbose logging for framewise.
use framewise::frames::{frame, FrameSpec};
use framewise::padding::CenterMode;
use framewise::stft::{Stft, StftConfig};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .init();

    let signal: Vec<f32> = (0..64).map(|i| i as f32).collect();
    let spec = FrameSpec::new(16, 4, CenterMode::HalfHop, true).unwrap();
    let frames = frame(&signal, &spec);
    println!("{} frames", frames.len());

    let stft = Stft::new(StftConfig::new(spec));
    let spectrum = stft.analyze(&signal).unwrap();
    let restored = stft.synthesize(&spectrum).unwrap();
    println!("restored {} samples", restored.len());
}
