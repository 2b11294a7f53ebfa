use hound::{SampleFormat, WavSpec, WavWriter};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use framewise::exec::ExecContext;
use framewise::frames::{frame_count, FrameSpec};
use framewise::level::rms_contour_batch;
use framewise::loudness::{contour_to_db, measure_loudness, Guard};
use framewise::stft::{Stft, StftConfig};
use framewise::FrameError;

/// Decoded audio, one buffer per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Audio {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl Audio {
    /// Split interleaved samples into `channels` buffers.
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let mut planes = vec![Vec::with_capacity(samples.len() / channels); channels];
        for frame in samples.chunks(channels) {
            for (plane, &s) in planes.iter_mut().zip(frame) {
                plane.push(s);
            }
        }
        Self {
            sample_rate,
            channels: planes,
        }
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn interleaved(&self) -> Vec<f32> {
        let n = self.len();
        let mut out = Vec::with_capacity(n * self.channels.len());
        for i in 0..n {
            out.extend(self.channels.iter().map(|c| c[i]));
        }
        out
    }
}

fn invalid(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Next packet, or `None` at end of stream.
fn next_packet(reader: &mut dyn FormatReader) -> Result<Option<Packet>, SymphoniaError> {
    match reader.next_packet() {
        Ok(packet) => Ok(Some(packet)),
        Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
            Ok(None)
        }
        // chained streams are not followed
        Err(SymphoniaError::ResetRequired) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Decode WAV, FLAC or MP3 into per-channel `f32` buffers.
///
/// The container is probed from the content; the extension is only a hint.
pub fn decode(path: &Path) -> Result<Audio, Box<dyn Error>> {
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    let source = MediaSourceStream::new(Box::new(File::open(path)?), Default::default());
    let mut reader = get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?
        .format;
    let track = reader
        .default_track()
        .ok_or_else(|| invalid("no supported audio tracks"))?;
    let track_id = track.id;
    let params = track.codec_params.clone();
    let sample_rate = params
        .sample_rate
        .ok_or_else(|| invalid("unknown sample rate"))?;
    let mut decoder = get_codecs().make(&params, &DecoderOptions::default())?;

    let mut planes: Vec<Vec<f32>> = Vec::new();
    while let Some(packet) = next_packet(reader.as_mut())? {
        if packet.track_id() != track_id {
            continue;
        }
        let block = decoder.decode(&packet)?;
        let frames = block.frames();
        if frames == 0 {
            continue;
        }
        let spec = *block.spec();
        if planes.is_empty() {
            planes = vec![Vec::new(); spec.channels.count().max(1)];
        }
        let mut buf = SampleBuffer::<f32>::new(block.capacity() as u64, spec);
        buf.copy_planar_ref(block);
        for (plane, chunk) in planes.iter_mut().zip(buf.samples().chunks(frames)) {
            plane.extend_from_slice(chunk);
        }
    }
    if let Some(n) = params.n_frames {
        for plane in &mut planes {
            plane.truncate(n as usize);
        }
    }
    if planes.is_empty() {
        planes.push(Vec::new());
    }
    Ok(Audio {
        sample_rate,
        channels: planes,
    })
}

/// Write 16-bit PCM with one WAV channel per buffer, clipping to `[-1, 1]`.
pub fn write_wav(path: &Path, audio: &Audio) -> Result<(), Box<dyn Error>> {
    let spec = WavSpec {
        channels: audio.channels.len() as u16,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for s in audio.interleaved() {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Round-trip figures for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReport {
    pub max_error: f64,
    pub rms_error: f64,
    pub loudness_db: f64,
    pub peak_frame_db: f64,
}

/// Outcome of one analysis/synthesis pass over every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sample_rate: u32,
    pub samples: usize,
    pub frames: usize,
    pub reconstructed: usize,
    pub channels: Vec<ChannelReport>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sample rate:        {} Hz", self.sample_rate)?;
        writeln!(f, "channels:           {}", self.channels.len())?;
        writeln!(f, "samples:            {}", self.samples)?;
        writeln!(f, "frames:             {}", self.frames)?;
        write!(f, "reconstructed:      {}", self.reconstructed)?;
        for (i, c) in self.channels.iter().enumerate() {
            write!(
                f,
                "\n[{i}] max {:.3e}  rms {:.3e}  loudness {:.2} dB  loudest frame {:.2} dB",
                c.max_error, c.rms_error, c.loudness_db, c.peak_frame_db
            )?;
        }
        Ok(())
    }
}

/// Compare a channel with its reconstruction over the overlapping prefix.
fn channel_report(x: &[f64], y: &[f64], levels: &[f64]) -> ChannelReport {
    let mut max_error = 0.0f64;
    let mut sq = 0.0f64;
    for (a, b) in x.iter().zip(y) {
        let d = (a - b).abs();
        max_error = max_error.max(d);
        sq += d * d;
    }
    ChannelReport {
        max_error,
        rms_error: if y.is_empty() {
            0.0
        } else {
            (sq / y.len() as f64).sqrt()
        },
        loudness_db: measure_loudness(x),
        peak_frame_db: contour_to_db(levels)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Analyse and resynthesise every channel as one batch on `ctx`.
/// Returns the report and the reconstructed audio.
pub fn round_trip(
    audio: &Audio,
    spec: &FrameSpec,
    n_fft: Option<usize>,
    ctx: &ExecContext,
) -> Result<(Report, Audio), FrameError> {
    let batch: Vec<Vec<f64>> = audio
        .channels
        .iter()
        .map(|c| c.iter().map(|&s| s as f64).collect())
        .collect();
    let mut config = StftConfig::new(*spec);
    if let Some(n) = n_fft {
        config = config.with_n_fft(n)?;
    }
    let stft = Stft::new(config);
    let spectra = stft.analyze_batch(ctx, &batch)?;
    let rebuilt = stft.synthesize_batch(ctx, &spectra)?;
    let levels = rms_contour_batch(ctx, &batch, spec, None, Guard::default())?;

    let channels = batch
        .iter()
        .zip(&rebuilt)
        .zip(&levels)
        .map(|((x, y), l)| channel_report(x, y, l))
        .collect();
    let report = Report {
        sample_rate: audio.sample_rate,
        samples: audio.len(),
        frames: frame_count(audio.len(), spec),
        reconstructed: rebuilt.first().map_or(0, Vec::len),
        channels,
    };
    let out = Audio {
        sample_rate: audio.sample_rate,
        channels: rebuilt
            .into_iter()
            .map(|c| c.into_iter().map(|v| v as f32).collect())
            .collect(),
    };
    Ok((report, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use framewise::padding::CenterMode;

    fn tone(amplitude: f32, len: usize, sample_rate: u32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn interleave_round_trip() {
        let audio = Audio::from_interleaved(&[1.0, -1.0, 0.5, -0.5, 0.25, -0.25], 2, 8000);
        assert_eq!(audio.channels, vec![vec![1.0, 0.5, 0.25], vec![-1.0, -0.5, -0.25]]);
        assert_eq!(audio.len(), 3);
        assert_eq!(audio.interleaved(), vec![1.0, -1.0, 0.5, -0.5, 0.25, -0.25]);
    }

    #[test]
    fn round_trip_reports_each_channel() {
        let sr = 8000;
        let audio = Audio {
            sample_rate: sr,
            channels: vec![tone(0.5, sr as usize, sr), tone(0.25, sr as usize, sr)],
        };
        let spec = FrameSpec::new(512, 128, CenterMode::HalfHop, true).unwrap();
        let (report, out) = round_trip(&audio, &spec, None, &ExecContext::serial()).unwrap();
        assert_eq!(report.frames, 62);
        assert_eq!(report.reconstructed, 62 * 128);
        assert_eq!(out.channels.len(), 2);
        assert_eq!(out.len(), report.reconstructed);
        assert_eq!(report.channels.len(), 2);
        assert!(report.channels.iter().all(|c| c.max_error < 1e-9));
        // mean intensity a^2 / 2
        assert!((report.channels[0].loudness_db - 10.0 * 0.125f64.log10()).abs() < 0.01);
        assert!((report.channels[1].loudness_db - 10.0 * 0.03125f64.log10()).abs() < 0.01);
        assert!(report.to_string().contains("frames:             62"));
    }
}
