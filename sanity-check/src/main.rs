use clap::Parser;
use framewise::exec::ExecContext;
use framewise::frames::FrameSpec;
use framewise::loudness::impose_loudness;
use sanity_check::{decode, round_trip, write_wav, Audio};
use std::error::Error;
use std::path::PathBuf;

/// Run framewise's STFT round trip on an audio file and report how well it
/// reconstructs.
#[derive(Parser)]
struct Args {
    /// Path to input audio (WAV, FLAC or MP3)
    input: PathBuf,

    /// Frame length in samples
    #[arg(long, default_value_t = 1024)]
    win_length: usize,

    /// Frame stride in samples
    #[arg(long, default_value_t = 256)]
    hop_length: usize,

    /// Center mode: 0 start, 1 hop-centered, 2 half-hop-centered
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=2))]
    center: u8,

    /// FFT size (defaults to the frame length)
    #[arg(long)]
    n_fft: Option<usize>,

    /// Worker threads; overrides FRAMEWISE_THREADS
    #[arg(long)]
    threads: Option<usize>,

    /// Normalise the reconstruction to this loudness before writing it.
    /// One gain is applied to all channels.
    #[arg(long, allow_hyphen_values = true)]
    target_db: Option<f64>,

    /// Write the reconstructed audio as 16-bit WAV
    #[arg(long)]
    output: Option<PathBuf>,
}

#[cfg(feature = "parallel")]
fn exec_context(threads: Option<usize>) -> Result<ExecContext, Box<dyn Error>> {
    Ok(match threads {
        Some(1) => ExecContext::serial(),
        Some(n) => ExecContext::parallel(n)?,
        None => ExecContext::from_env(),
    })
}

#[cfg(not(feature = "parallel"))]
fn exec_context(_threads: Option<usize>) -> Result<ExecContext, Box<dyn Error>> {
    Ok(ExecContext::serial())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let audio = decode(&args.input)?;
    let spec = FrameSpec::from_code(args.win_length, args.hop_length, args.center, true)?;
    let ctx = exec_context(args.threads)?;

    let (report, mut out) = round_trip(&audio, &spec, args.n_fft, &ctx)?;
    println!("{report}");

    if let Some(path) = args.output {
        if let Some(target) = args.target_db {
            let scaled = impose_loudness(&out.interleaved(), target as f32);
            out = Audio::from_interleaved(&scaled, out.channels.len(), out.sample_rate);
        }
        write_wav(&path, &out)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
