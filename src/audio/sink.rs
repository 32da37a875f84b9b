//! Playback backends for precomputed PCM buffers

use super::error::Result;

/// Something that can play mono 16-bit buffers at [`super::synth::SAMPLE_RATE`].
///
/// One-shots are fire-and-forget and may overlap. At most one loop plays
/// at a time; starting a new one replaces the old.
pub trait AudioSink {
    fn play_once(&mut self, samples: &[i16], volume: f32) -> Result<()>;
    fn start_loop(&mut self, samples: &[i16], volume: f32) -> Result<()>;
    fn stop_loop(&mut self) -> Result<()>;
    /// Change the level of the playing loop, if any
    fn set_loop_volume(&mut self, volume: f32) -> Result<()>;
    /// Unlock playback after a user gesture (browsers start suspended)
    fn resume(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode};

    use super::AudioSink;
    use crate::audio::error::{AudioError, Result};
    use crate::audio::synth::{FULL_SCALE, SAMPLE_RATE};

    fn js_err(context: &str, e: wasm_bindgen::JsValue) -> AudioError {
        AudioError::Playback(format!("{context}: {e:?}"))
    }

    /// Web Audio backend. Buffers are converted once and cached by slice identity,
    /// which holds because the sound bank outlives the sink.
    pub struct WebAudioSink {
        ctx: AudioContext,
        buffers: Vec<(usize, usize, AudioBuffer)>,
        music: Option<(AudioBufferSourceNode, GainNode)>,
    }

    impl WebAudioSink {
        pub fn new() -> Result<Self> {
            let ctx = AudioContext::new()
                .map_err(|e| AudioError::Unavailable(format!("AudioContext: {e:?}")))?;
            Ok(Self {
                ctx,
                buffers: Vec::new(),
                music: None,
            })
        }

        fn buffer_for(&mut self, samples: &[i16]) -> Result<AudioBuffer> {
            let key = (samples.as_ptr() as usize, samples.len());
            if let Some((_, _, buffer)) = self
                .buffers
                .iter()
                .find(|(ptr, len, _)| (*ptr, *len) == key)
            {
                return Ok(buffer.clone());
            }

            let buffer = self
                .ctx
                .create_buffer(1, samples.len().max(1) as u32, SAMPLE_RATE as f32)
                .map_err(|e| js_err("create_buffer", e))?;
            let mut data: Vec<f32> = samples.iter().map(|&s| s as f32 / FULL_SCALE).collect();
            buffer
                .copy_to_channel(&mut data, 0)
                .map_err(|e| js_err("copy_to_channel", e))?;
            self.buffers.push((key.0, key.1, buffer.clone()));
            Ok(buffer)
        }

        fn voice(
            &mut self,
            samples: &[i16],
            volume: f32,
        ) -> Result<(AudioBufferSourceNode, GainNode)> {
            let buffer = self.buffer_for(samples)?;
            let source = self
                .ctx
                .create_buffer_source()
                .map_err(|e| js_err("create_buffer_source", e))?;
            source.set_buffer(Some(&buffer));

            let gain = self.ctx.create_gain().map_err(|e| js_err("create_gain", e))?;
            gain.gain().set_value(volume);
            source
                .connect_with_audio_node(&gain)
                .map_err(|e| js_err("connect", e))?;
            gain.connect_with_audio_node(&self.ctx.destination())
                .map_err(|e| js_err("connect", e))?;
            Ok((source, gain))
        }
    }

    impl AudioSink for WebAudioSink {
        fn play_once(&mut self, samples: &[i16], volume: f32) -> Result<()> {
            self.resume();
            let (source, _gain) = self.voice(samples, volume)?;
            source.start().map_err(|e| js_err("start", e))
        }

        fn start_loop(&mut self, samples: &[i16], volume: f32) -> Result<()> {
            self.stop_loop()?;
            let (source, gain) = self.voice(samples, volume)?;
            source.set_loop(true);
            source.start().map_err(|e| js_err("start", e))?;
            self.music = Some((source, gain));
            Ok(())
        }

        fn stop_loop(&mut self) -> Result<()> {
            if let Some((source, _)) = self.music.take() {
                source.stop().map_err(|e| js_err("stop", e))?;
            }
            Ok(())
        }

        fn set_loop_volume(&mut self, volume: f32) -> Result<()> {
            if let Some((_, gain)) = &self.music {
                gain.gain().set_value(volume);
            }
            Ok(())
        }

        fn resume(&mut self) {
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
        }
    }
}
