//! Audio error type

use thiserror::Error;

/// Everything that can go wrong producing or playing sound.
/// None of these are fatal to a run; callers degrade to silence.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No usable playback device/context
    #[error("Audio unavailable: {0}")]
    Unavailable(String),

    /// One buffer or voice could not be played; the device still works
    #[error("Playback failed: {0}")]
    Playback(String),

    /// IO error from the filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unreadable WAV data
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// WAV parsed but is not mono 16-bit 44.1 kHz PCM
    #[error("Unsupported WAV format: {channels} ch, {bits} bit, {sample_rate} Hz")]
    UnsupportedFormat {
        channels: u16,
        bits: u16,
        sample_rate: u32,
    },
}

impl AudioError {
    /// Playback itself is impossible (as opposed to one asset failing)
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AudioError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, AudioError>;
