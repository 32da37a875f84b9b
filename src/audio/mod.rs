//! Procedural audio: synthesis, WAV caching and playback
//!
//! Everything is generated at startup; no asset files are required.

pub mod beat;
pub mod director;
pub mod error;
pub mod sink;
pub mod sounds;
pub mod synth;
pub mod wav;

pub use beat::{BeatClock, BeatPoll};
pub use director::AudioDirector;
pub use error::AudioError;
pub use sink::AudioSink;
#[cfg(target_arch = "wasm32")]
pub use sink::WebAudioSink;
pub use sounds::{MusicStyle, SoundBank, SoundEffect};
