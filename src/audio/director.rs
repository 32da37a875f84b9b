//! Audio director: owns the sound bank, the playback sink and the beat clock

use super::beat::{BeatClock, BeatPoll};
use super::error::Result;
use super::sink::AudioSink;
use super::sounds::{MUSIC_BASE_VOLUME, SoundBank, SoundEffect};
use crate::settings::Settings;

/// Triggers effects and the music loop, and reports beats.
///
/// Without a sink (or after the sink fails) everything is silent but the
/// beat clock still runs.
pub struct AudioDirector {
    bank: SoundBank,
    sink: Option<Box<dyn AudioSink>>,
    beat: BeatClock,
    sfx_volume: f32,
    music_volume: f32,
    music_playing: bool,
}

impl AudioDirector {
    pub fn new(bank: SoundBank, sink: Option<Box<dyn AudioSink>>) -> Self {
        let defaults = Settings::default();
        Self {
            beat: BeatClock::new(bank.music_style.bpm()),
            bank,
            sink,
            sfx_volume: defaults.effective_sfx_volume(),
            music_volume: defaults.effective_music_volume(),
            music_playing: false,
        }
    }

    /// A director that never makes a sound
    pub fn silent(bank: SoundBank) -> Self {
        Self::new(bank, None)
    }

    pub fn is_silent(&self) -> bool {
        self.sink.is_none()
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Run a sink operation. A lost device silences the director for good;
    /// any other failure only skips this one sound.
    fn with_sink(
        &mut self,
        what: &str,
        op: impl FnOnce(&mut dyn AudioSink, &SoundBank) -> Result<()>,
    ) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        match op(sink.as_mut(), &self.bank) {
            Ok(()) => {}
            Err(e) if e.is_unavailable() => {
                log::warn!("Audio {} failed: {} - continuing without sound", what, e);
                self.sink = None;
            }
            Err(e) => log::warn!("Audio {} failed: {}", what, e),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if self.music_playing {
            let volume = self.music_volume * MUSIC_BASE_VOLUME;
            self.with_sink("volume change", |sink, _| sink.set_loop_volume(volume));
        }
    }

    /// Fire-and-forget one-shot
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.sfx_volume * effect.base_volume();
        if volume <= 0.0 {
            return;
        }
        self.with_sink(effect.name(), |sink, bank| {
            sink.play_once(bank.effect(effect), volume)
        });
    }

    /// Start the music loop and restart the beat clock at `now_ms`
    pub fn start_loop(&mut self, now_ms: f64) {
        if self.music_playing {
            self.stop_loop();
        }
        self.beat.start(now_ms);
        self.music_playing = true;
        let volume = self.music_volume * MUSIC_BASE_VOLUME;
        self.with_sink("music loop", |sink, bank| {
            sink.start_loop(&bank.music_loop, volume)
        });
    }

    pub fn stop_loop(&mut self) {
        self.beat.stop();
        if !self.music_playing {
            return;
        }
        self.music_playing = false;
        self.with_sink("music stop", |sink, _| sink.stop_loop());
    }

    /// Side-effecting: at most one beat per call
    pub fn poll_beat(&mut self, now_ms: f64) -> BeatPoll {
        self.beat.poll(now_ms)
    }

    /// Unlock playback after a user gesture
    pub fn resume(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.resume();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::testing::{RecordingSink, SinkCall};
    use crate::audio::sounds::MusicStyle;

    fn bank() -> SoundBank {
        SoundBank {
            jump: vec![1; 10],
            crash: vec![2; 20],
            speed_up: vec![3; 30],
            music_loop: vec![4; 40],
            music_style: MusicStyle::Classic,
        }
    }

    fn recording() -> (AudioDirector, RecordingSink) {
        let sink = RecordingSink::default();
        let director = AudioDirector::new(bank(), Some(Box::new(sink.clone())));
        (director, sink)
    }

    #[test]
    fn test_play_uses_effect_buffer_and_volume() {
        let (mut director, sink) = recording();
        director.apply_settings(&Settings {
            master_volume: 1.0,
            sfx_volume: 0.5,
            ..Default::default()
        });
        director.play(SoundEffect::Crash);
        assert_eq!(
            sink.calls.borrow().as_slice(),
            &[SinkCall::PlayOnce { len: 20, volume: 0.25 }]
        );
    }

    #[test]
    fn test_muted_skips_effects_but_keeps_beats() {
        let (mut director, sink) = recording();
        director.apply_settings(&Settings {
            muted: true,
            ..Default::default()
        });
        director.play(SoundEffect::Jump);
        director.start_loop(0.0);
        assert_eq!(
            sink.calls.borrow().as_slice(),
            &[SinkCall::StartLoop { len: 40, volume: 0.0 }]
        );
        assert!(director.poll_beat(500.0).occurred);
    }

    #[test]
    fn test_restarting_loop_never_overlaps() {
        let (mut director, sink) = recording();
        director.start_loop(0.0);
        director.start_loop(1_000.0);
        let calls = sink.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], SinkCall::StartLoop { .. }));
        assert_eq!(calls[1], SinkCall::StopLoop);
        assert!(matches!(calls[2], SinkCall::StartLoop { .. }));
    }

    #[test]
    fn test_stop_without_loop_is_noop() {
        let (mut director, sink) = recording();
        director.stop_loop();
        assert!(sink.calls.borrow().is_empty());
        assert!(!director.poll_beat(10_000.0).occurred);
    }

    #[test]
    fn test_failing_sink_degrades_to_silence() {
        let mut director = AudioDirector::new(bank(), Some(Box::new(RecordingSink::failing())));
        assert!(!director.is_silent());
        director.start_loop(0.0);
        assert!(director.is_silent());

        // Still usable, still beating
        director.play(SoundEffect::Jump);
        let poll = director.poll_beat(500.0);
        assert!(poll.occurred);
        assert_eq!(poll.count, 1);
    }

    #[test]
    fn test_beat_follows_loop_tempo() {
        let bank = SoundBank {
            music_style: MusicStyle::Dash,
            ..bank()
        };
        let mut director = AudioDirector::silent(bank);
        director.start_loop(0.0);
        assert!(!director.poll_beat(420.0).occurred);
        assert!(director.poll_beat(430.0).occurred);
    }

    #[test]
    fn test_single_playback_failure_keeps_sink() {
        let mut director = AudioDirector::new(bank(), Some(Box::new(RecordingSink::glitching())));
        director.play(SoundEffect::Jump);
        director.start_loop(0.0);
        assert!(!director.is_silent());
        assert!(director.poll_beat(500.0).occurred);
    }

    #[test]
    fn test_volume_change_reaches_playing_loop() {
        let (mut director, sink) = recording();
        director.start_loop(0.0);
        director.apply_settings(&Settings {
            master_volume: 1.0,
            music_volume: 1.0,
            ..Default::default()
        });
        assert_eq!(
            sink.calls.borrow().last(),
            Some(&SinkCall::SetLoopVolume(MUSIC_BASE_VOLUME))
        );
    }
}
