//! Canonical PCM WAV container (RIFF, mono, 16-bit, 44.1 kHz)
//!
//! Header layout written and expected:
//! `RIFF <36 + data> WAVE fmt <16> <1=PCM> <1 ch> <44100> <88200> <2> <16> data <len>`

use std::io::Cursor;
use std::path::Path;

use super::error::{AudioError, Result};
use super::synth::SAMPLE_RATE;

/// Size of the header preceding the sample data
pub const HEADER_LEN: usize = 44;

fn wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn check_spec(spec: hound::WavSpec) -> Result<()> {
    if spec != wav_spec() {
        return Err(AudioError::UnsupportedFormat {
            channels: spec.channels,
            bits: spec.bits_per_sample,
            sample_rate: spec.sample_rate,
        });
    }
    Ok(())
}

fn write_samples<W: std::io::Write + std::io::Seek>(
    mut writer: hound::WavWriter<W>,
    samples: &[i16],
) -> Result<()> {
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Serialize samples as little-endian 16-bit PCM in a WAV container
pub fn encode_wav(samples: &[i16]) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    let writer = hound::WavWriter::new(Cursor::new(&mut bytes), wav_spec())?;
    write_samples(writer, samples)?;
    Ok(bytes)
}

/// Parse WAV bytes produced by [`encode_wav`] (or any equivalent file)
pub fn decode_wav(bytes: &[u8]) -> Result<Vec<i16>> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    check_spec(reader.spec())?;
    let samples = reader.samples::<i16>().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(samples)
}

/// Write samples to a WAV file, creating parent directories as needed
pub fn save_wav(path: &Path, samples: &[i16]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = hound::WavWriter::create(path, wav_spec())?;
    write_samples(writer, samples)
}

/// Read a WAV file written by [`save_wav`]
pub fn load_wav(path: &Path) -> Result<Vec<i16>> {
    let mut reader = hound::WavReader::open(path)?;
    check_spec(reader.spec())?;
    let samples = reader.samples::<i16>().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(samples)
}

/// Load a cached buffer, or synthesize it and try to cache it.
/// Failures are logged and never fatal: the synthesized buffer is returned
/// even when it cannot be saved.
pub fn load_or_synthesize(path: &Path, synthesize: impl FnOnce() -> Vec<i16>) -> Vec<i16> {
    match load_wav(path) {
        Ok(samples) => {
            log::info!("Loaded {} ({} samples)", path.display(), samples.len());
            return samples;
        }
        Err(e) => log::warn!("Could not load {}: {} - synthesizing", path.display(), e),
    }

    let samples = synthesize();
    match save_wav(path, &samples) {
        Ok(()) => log::info!("Saved {} ({} samples)", path.display(), samples.len()),
        Err(e) => log::warn!("Could not save {}: {}", path.display(), e),
    }
    samples
}
