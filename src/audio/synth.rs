//! Offline waveform synthesis into 16-bit PCM buffers
//!
//! Every function returns a finite buffer at [`SAMPLE_RATE`]. Amplitudes are
//! fractions of full scale (1.0 = 32767).

use std::f32::consts::{PI, TAU};

use rand::Rng;

/// Fixed output rate for all generated audio
pub const SAMPLE_RATE: u32 = 44_100;
/// Largest magnitude a sample may take after clipping
pub const FULL_SCALE: f32 = i16::MAX as f32;

/// Number of samples covering `duration` seconds
#[inline]
pub fn sample_count(duration: f32) -> usize {
    (duration.max(0.0) as f64 * SAMPLE_RATE as f64).round() as usize
}

/// Round and clip a full-scale float sample to 16 bits
#[inline]
pub fn quantize(value: f32) -> i16 {
    value.round().clamp(-FULL_SCALE, FULL_SCALE) as i16
}

/// Build a buffer by sampling `wave(t)` (t in seconds, result in -1..=1)
fn render(duration: f32, amplitude: f32, mut wave: impl FnMut(f32) -> f32) -> Vec<i16> {
    let scale = amplitude * FULL_SCALE;
    (0..sample_count(duration))
        .map(|i| quantize(wave(i as f32 / SAMPLE_RATE as f32) * scale))
        .collect()
}

/// Sign with sign(0) == 0
#[inline]
fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn sine(freq: f32, duration: f32, amplitude: f32) -> Vec<i16> {
    render(duration, amplitude, |t| (TAU * freq * t).sin())
}

pub fn square(freq: f32, duration: f32, amplitude: f32) -> Vec<i16> {
    render(duration, amplitude, |t| sign((TAU * freq * t).sin()))
}

/// Arcsine-shaped triangle (continuous slope, starts at 0 rising)
pub fn triangle(freq: f32, duration: f32, amplitude: f32) -> Vec<i16> {
    render(duration, amplitude, |t| {
        (2.0 / PI) * (TAU * freq * t).sin().clamp(-1.0, 1.0).asin()
    })
}

pub fn sawtooth(freq: f32, duration: f32, amplitude: f32) -> Vec<i16> {
    render(duration, amplitude, |t| {
        let x = t * freq;
        2.0 * (x - (0.5 + x).floor())
    })
}

/// Uniform white noise in [-amplitude, amplitude]
pub fn noise<R: Rng + ?Sized>(rng: &mut R, duration: f32, amplitude: f32) -> Vec<i16> {
    render(duration, amplitude, |_| rng.random_range(-1.0..=1.0))
}

/// Sine whose frequency moves linearly from `start_freq` to `end_freq`.
/// Phase is integrated sample by sample so the sweep has no discontinuities.
pub fn frequency_sweep(start_freq: f32, end_freq: f32, duration: f32, amplitude: f32) -> Vec<i16> {
    let n = sample_count(duration);
    let scale = amplitude * FULL_SCALE;
    let mut phase = 0.0f32;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let progress = i as f32 / n as f32;
        let freq = start_freq + (end_freq - start_freq) * progress;
        out.push(quantize(phase.sin() * scale));
        phase = (phase + TAU * freq / SAMPLE_RATE as f32).rem_euclid(TAU);
    }
    out
}

/// Stage lengths of an ADSR envelope, in samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack: usize,
    pub decay: usize,
    pub sustain_level: f32,
    pub release: usize,
}

impl Adsr {
    /// Envelope from stage durations in seconds
    pub fn from_secs(attack: f32, decay: f32, sustain_level: f32, release: f32) -> Self {
        Self {
            attack: sample_count(attack),
            decay: sample_count(decay),
            sustain_level,
            release: sample_count(release),
        }
    }

    /// Linear fade from full level to silence over the whole buffer
    pub fn fade_out(len: usize) -> Self {
        Self {
            attack: 0,
            decay: 0,
            sustain_level: 1.0,
            release: len,
        }
    }

    /// Stage lengths scaled down proportionally to fit `len` samples
    pub fn fit(&self, len: usize) -> (usize, usize, usize) {
        let total = self.attack + self.decay + self.release;
        if total <= len {
            return (self.attack, self.decay, self.release);
        }
        let scale = len as f64 / total as f64;
        let attack = (self.attack as f64 * scale).floor() as usize;
        let decay = (self.decay as f64 * scale).floor() as usize;
        let release = (self.release as f64 * scale).floor() as usize;
        (attack, decay, release)
    }

    /// Gain at sample `i` of a buffer of `len` samples
    pub fn gain_at(&self, i: usize, len: usize) -> f32 {
        let (attack, decay, release) = self.fit(len);
        let sustain_end = len - release;
        if i < attack {
            i as f32 / attack as f32
        } else if i < attack + decay {
            let t = (i - attack) as f32 / decay as f32;
            1.0 + (self.sustain_level - 1.0) * t
        } else if i < sustain_end {
            self.sustain_level
        } else {
            let t = (i - sustain_end + 1) as f32 / release as f32;
            self.sustain_level * (1.0 - t)
        }
    }
}

/// Scale a buffer in place by a four-stage envelope.
/// Stages that do not fit are compressed, never overrun.
pub fn apply_envelope(buffer: &mut [i16], env: Adsr) {
    let len = buffer.len();
    for (i, sample) in buffer.iter_mut().enumerate() {
        *sample = quantize(*sample as f32 * env.gain_at(i, len));
    }
}

/// Scale a buffer in place by one half-period of a sine (soft staccato note)
pub fn apply_sine_window(buffer: &mut [i16]) {
    let len = buffer.len() as f32;
    for (i, sample) in buffer.iter_mut().enumerate() {
        *sample = quantize(*sample as f32 * (PI * i as f32 / len).sin());
    }
}

/// Scale a buffer in place by `gain(t)`, t in seconds from its start
pub fn apply_gain(buffer: &mut [i16], gain: impl Fn(f32) -> f32) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        let t = i as f32 / SAMPLE_RATE as f32;
        *sample = quantize(*sample as f32 * gain(t));
    }
}

/// Scale a buffer in place by `exp(-rate * t)`
pub fn apply_exp_decay(buffer: &mut [i16], rate: f32) {
    apply_gain(buffer, |t| (-rate * t).exp());
}

/// Soft-clip through `tanh(drive * x) * level`, x as a fraction of full scale
pub fn apply_saturation(buffer: &mut [i16], drive: f32, level: f32) {
    for sample in buffer.iter_mut() {
        let x = *sample as f32 / FULL_SCALE;
        *sample = quantize((drive * x).tanh() * level * FULL_SCALE);
    }
}

/// Elementwise sum with saturation to ±32767.
/// The result is as long as the longest input; shorter inputs count as silence.
pub fn mix(buffers: &[&[i16]]) -> Vec<i16> {
    let len = buffers.iter().map(|b| b.len()).max().unwrap_or(0);
    let mut acc = vec![0i32; len];
    for buffer in buffers {
        for (a, &s) in acc.iter_mut().zip(buffer.iter()) {
            *a += s as i32;
        }
    }
    acc.into_iter()
        .map(|s| s.clamp(-(i16::MAX as i32), i16::MAX as i32) as i16)
        .collect()
}

/// Float accumulator for assembling a longer piece from short buffers
#[derive(Debug, Clone)]
pub struct Track {
    samples: Vec<f32>,
}

impl Track {
    pub fn silent(duration: f32) -> Self {
        Self {
            samples: vec![0.0; sample_count(duration)],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Add `buffer` starting at `offset` seconds; anything past the end is dropped
    pub fn add_at(&mut self, offset: f32, buffer: &[i16]) {
        let start = sample_count(offset);
        if start >= self.samples.len() {
            return;
        }
        for (dst, &src) in self.samples[start..].iter_mut().zip(buffer) {
            *dst += src as f32;
        }
    }

    /// Scale so the loudest sample sits at `peak` of full scale
    pub fn normalize(&self, peak: f32) -> Vec<i16> {
        let max = self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        if max == 0.0 {
            return vec![0; self.samples.len()];
        }
        let gain = peak * FULL_SCALE / max;
        self.samples.iter().map(|s| quantize(s * gain)).collect()
    }
}
