//! The game's sound effects and music loop, synthesized once at startup

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::synth::{
    Adsr, SAMPLE_RATE, Track, apply_envelope, apply_exp_decay, apply_gain, apply_saturation,
    apply_sine_window, frequency_sweep, mix, noise, sample_count, sawtooth, sine, square,
    triangle,
};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player leaves the ground
    Jump,
    /// Player hits an obstacle
    Crash,
    /// Scroll speed increased
    SpeedUp,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 3] = [SoundEffect::Jump, SoundEffect::Crash, SoundEffect::SpeedUp];

    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Crash => "crash",
            SoundEffect::SpeedUp => "speed_up",
        }
    }

    /// Per-effect playback level (before settings volumes)
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Jump => 0.4,
            SoundEffect::Crash => 0.5,
            SoundEffect::SpeedUp => 0.4,
        }
    }
}

/// Which music loop to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicStyle {
    /// Square melody over a sawtooth bass, 16 beats at 120 BPM
    #[default]
    Classic,
    /// Arpeggios, wobble bass, snare and risers, 8 bars at 140 BPM
    Dash,
}

impl MusicStyle {
    pub fn bpm(self) -> f64 {
        match self {
            MusicStyle::Classic => 120.0,
            MusicStyle::Dash => 140.0,
        }
    }

    /// Beats in one pass of the loop
    pub fn loop_beats(self) -> usize {
        match self {
            MusicStyle::Classic => CLASSIC_BEATS,
            MusicStyle::Dash => DASH_BARS * BEATS_PER_BAR,
        }
    }

    fn beat_secs(self) -> f32 {
        (60.0 / self.bpm()) as f32
    }
}

/// Playback level of the music loop (before settings volumes)
pub const MUSIC_BASE_VOLUME: f32 = 0.5;
const BEATS_PER_BAR: usize = 4;
const CLASSIC_BEATS: usize = 16;
const DASH_BARS: usize = 8;

/// C major, C4..C5
const MELODY_NOTES: [f32; 8] = [261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88, 523.25];
const MELODY_PATTERN: [usize; CLASSIC_BEATS] = [0, 2, 4, 7, 6, 4, 2, 0, 1, 3, 5, 7, 5, 3, 1, 0];
/// C2 D2 E2 F2
const BASS_NOTES: [f32; 4] = [65.41, 73.42, 82.41, 87.31];
const BASS_PATTERN: [usize; CLASSIC_BEATS] = [0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 2, 1];

/// C pentatonic, C4..E5
const ARP_NOTES: [f32; 8] = [261.63, 293.66, 329.63, 392.00, 440.00, 523.25, 587.33, 659.25];
/// One bar of eighth notes, repeated
const ARP_BAR: [usize; 8] = [0, 4, 7, 4, 2, 5, 7, 5];
const ARP_REPEATS: usize = 4;
/// Two beats per bass note, repeated
const WOBBLE_BAR: [usize; 8] = [0, 0, 1, 1, 2, 2, 3, 3];

/// Descending 800 -> 400 Hz chirp with a linear fade
pub fn jump_sound() -> Vec<i16> {
    let mut buf = frequency_sweep(800.0, 400.0, 0.3, 0.5);
    let len = buf.len();
    apply_envelope(&mut buf, Adsr::fade_out(len));
    buf
}

/// Half a second of fading white noise
pub fn crash_sound<R: Rng + ?Sized>(rng: &mut R) -> Vec<i16> {
    let mut buf = noise(rng, 0.5, 0.5);
    let len = buf.len();
    apply_envelope(&mut buf, Adsr::fade_out(len));
    buf
}

/// Three ascending staccato tones filling 500 ms
pub fn speed_up_sound() -> Vec<i16> {
    let total = sample_count(0.5);
    let mut out = Vec::with_capacity(total);
    for (j, freq) in [400.0f32, 600.0, 800.0].into_iter().enumerate() {
        let start = j * total / 3;
        let end = (j + 1) * total / 3;
        let mut note = sine(freq, (end - start) as f32 / SAMPLE_RATE as f32, 0.4);
        note.resize(end - start, 0);
        apply_sine_window(&mut note);
        out.extend_from_slice(&note);
    }
    out
}

/// The loop for `style`, normalized to 90% of full scale
pub fn music_loop<R: Rng + ?Sized>(style: MusicStyle, rng: &mut R) -> Vec<i16> {
    match style {
        MusicStyle::Classic => classic_loop(rng),
        MusicStyle::Dash => dash_loop(rng),
    }
}

fn classic_loop<R: Rng + ?Sized>(rng: &mut R) -> Vec<i16> {
    let style = MusicStyle::Classic;
    let beat = style.beat_secs();
    let mut track = Track::silent(beat * style.loop_beats() as f32);

    for (i, &note) in MELODY_PATTERN.iter().enumerate() {
        let mut wave = square(MELODY_NOTES[note], beat * 0.8, 0.3);
        let len = wave.len();
        apply_envelope(
            &mut wave,
            Adsr {
                attack: len / 20,
                decay: 0,
                sustain_level: 1.0,
                release: len / 5,
            },
        );
        track.add_at(i as f32 * beat, &wave);
    }

    for (i, &note) in BASS_PATTERN.iter().enumerate() {
        let mut wave = sawtooth(BASS_NOTES[note], beat * 0.7, 0.25);
        let len = wave.len();
        apply_envelope(
            &mut wave,
            Adsr {
                attack: len / 10,
                decay: 0,
                sustain_level: 1.0,
                release: len * 3 / 10,
            },
        );
        track.add_at(i as f32 * beat, &wave);
    }

    for i in 0..style.loop_beats() {
        let at = i as f32 * beat;
        // Kick on beats 1 and 3 of each bar
        if i % 4 == 0 || i % 4 == 2 {
            let mut kick = frequency_sweep(150.0, 50.0, 0.1, 0.5);
            apply_exp_decay(&mut kick, 20.0);
            track.add_at(at, &kick);
        }
        // Hi-hat on every beat
        let mut hat = noise(rng, 0.05, 0.15);
        apply_exp_decay(&mut hat, 50.0);
        track.add_at(at, &hat);
    }

    track.normalize(0.9)
}

fn dash_loop<R: Rng + ?Sized>(rng: &mut R) -> Vec<i16> {
    let style = MusicStyle::Dash;
    let beat = style.beat_secs();
    let bar = beat * BEATS_PER_BAR as f32;
    let mut track = Track::silent(beat * style.loop_beats() as f32);

    // Staccato square+triangle arpeggio on eighth notes
    let arp = ARP_BAR.iter().cycle().take(ARP_BAR.len() * ARP_REPEATS);
    for (i, &note) in arp.enumerate() {
        let len = beat * 0.2;
        let freq = ARP_NOTES[note];
        let mut wave = mix(&[&square(freq, len, 0.2), &triangle(freq, len, 0.1)]);
        apply_exp_decay(&mut wave, 10.0 / len);
        track.add_at(i as f32 * beat / 2.0, &wave);
    }

    // Saw+square bass with an 8 Hz wobble
    let bass = WOBBLE_BAR.iter().cycle().take(style.loop_beats());
    for (i, &note) in bass.enumerate() {
        let len = beat * 0.8;
        let freq = BASS_NOTES[note];
        let mut wave = mix(&[&sawtooth(freq, len, 0.25), &square(freq, len, 0.15)]);
        apply_gain(&mut wave, |t| 1.0 + 0.2 * (TAU * 8.0 * t).sin());
        let n = wave.len();
        apply_envelope(
            &mut wave,
            Adsr {
                attack: n / 10,
                decay: 0,
                sustain_level: 1.0,
                release: n * 3 / 10,
            },
        );
        track.add_at(i as f32 * beat, &wave);
    }

    for i in 0..style.loop_beats() {
        let at = i as f32 * beat;
        if i % 2 == 0 {
            let mut kick = frequency_sweep(180.0, 40.0, 0.15, 0.6);
            apply_saturation(&mut kick, 2.0, 0.5);
            apply_exp_decay(&mut kick, 15.0);
            track.add_at(at, &kick);
        }
        // Snare on beats 2 and 4
        if i % BEATS_PER_BAR == 1 || i % BEATS_PER_BAR == 3 {
            let mut snare = mix(&[&noise(rng, 0.2, 0.3), &sine(180.0, 0.2, 0.2)]);
            apply_exp_decay(&mut snare, 20.0);
            track.add_at(at, &snare);
        }
        let mut hat = noise(rng, 0.05, 0.15);
        apply_exp_decay(&mut hat, 60.0);
        track.add_at(at, &hat);
    }

    // Rising sweep across every 4th bar
    for i in (0..DASH_BARS).filter(|i| i % 4 == 3) {
        let mut riser = frequency_sweep(500.0, 5000.0, bar, 0.1);
        apply_gain(&mut riser, |t| (t / bar).powi(2));
        track.add_at(i as f32 * bar, &riser);
    }

    track.normalize(0.9)
}

/// Every precomputed buffer the game plays
#[derive(Debug, Clone)]
pub struct SoundBank {
    pub jump: Vec<i16>,
    pub crash: Vec<i16>,
    pub speed_up: Vec<i16>,
    pub music_loop: Vec<i16>,
    /// Style the loop was built in; sets the beat clock tempo
    pub music_style: MusicStyle,
}

impl SoundBank {
    pub fn synthesize<R: Rng + ?Sized>(style: MusicStyle, rng: &mut R) -> Self {
        let bank = Self {
            jump: jump_sound(),
            crash: crash_sound(rng),
            speed_up: speed_up_sound(),
            music_loop: music_loop(style, rng),
            music_style: style,
        };
        log::info!(
            "Synthesized sound bank ({:?} loop, {} samples, {:.1}s)",
            bank.music_style,
            bank.music_loop.len(),
            bank.music_loop.len() as f32 / SAMPLE_RATE as f32
        );
        bank
    }

    pub fn effect(&self, effect: SoundEffect) -> &[i16] {
        match effect {
            SoundEffect::Jump => &self.jump,
            SoundEffect::Crash => &self.crash,
            SoundEffect::SpeedUp => &self.speed_up,
        }
    }
}
