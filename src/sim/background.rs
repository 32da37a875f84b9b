//! Scrolling neon scenery
//!
//! Purely decorative: consumes the scroll speed and beat signal, never
//! affects gameplay.

use rand::Rng;

use super::palette::{BG_COLOR, NEON_COLORS, Rgb, pick};
use crate::consts::{GROUND_Y, SCREEN_WIDTH, TICK_RATE};

const LINE_COUNT: usize = 15;
const SHAPE_COUNT: usize = 10;
/// Retarget the tint at least this often
const TINT_INTERVAL_TICKS: u64 = 10 * TICK_RATE as u64;
/// Fraction of the remaining distance eased per tick
const TINT_EASE: f32 = 0.05;
/// Decorations scroll at a fraction of the world
const PARALLAX: f32 = 1.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorKind {
    Circle,
    Rect,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct DecorLine {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub speed: f32,
    pub color: Rgb,
    pub thickness: f32,
}

impl DecorLine {
    fn random<R: Rng + ?Sized>(rng: &mut R, x: f32) -> Self {
        Self {
            x,
            y: rng.random_range(0..=(GROUND_Y as u32 - 20)) as f32,
            length: rng.random_range(50..=150) as f32,
            speed: rng.random_range(1.0..3.0),
            color: pick(rng, &NEON_COLORS),
            thickness: rng.random_range(1..=3) as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecorShape {
    pub kind: DecorKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    pub color: Rgb,
    /// 0-255
    pub alpha: u8,
}

impl DecorShape {
    fn random<R: Rng + ?Sized>(rng: &mut R, x: f32) -> Self {
        let kind = match rng.random_range(0..3) {
            0 => DecorKind::Circle,
            1 => DecorKind::Rect,
            _ => DecorKind::Triangle,
        };
        Self {
            kind,
            x,
            y: rng.random_range(0..=(GROUND_Y as u32 - 50)) as f32,
            size: rng.random_range(10..=40) as f32,
            speed: rng.random_range(1.0..2.5),
            color: pick(rng, &NEON_COLORS),
            alpha: rng.random_range(30..=100),
        }
    }
}

/// Lines, shapes and a slowly drifting tint behind the playfield
#[derive(Debug, Clone)]
pub struct Background {
    pub lines: Vec<DecorLine>,
    pub shapes: Vec<DecorShape>,
    /// Current tint (float for smooth easing)
    pub tint: [f32; 3],
    pub target_tint: [f32; 3],
    pub last_retarget_tick: u64,
}

impl Background {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let lines = (0..LINE_COUNT)
            .map(|_| {
                let x = rng.random_range(0..=SCREEN_WIDTH as u32) as f32;
                DecorLine::random(rng, x)
            })
            .collect();
        let shapes = (0..SHAPE_COUNT)
            .map(|_| {
                let x = rng.random_range(0..=SCREEN_WIDTH as u32) as f32;
                DecorShape::random(rng, x)
            })
            .collect();
        let tint = BG_COLOR.map(f32::from);
        Self {
            lines,
            shapes,
            tint,
            target_tint: tint,
            last_retarget_tick: 0,
        }
    }

    /// Scroll decorations and ease the tint
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        scroll_speed: f32,
        now_tick: u64,
        beat: bool,
    ) {
        if beat || now_tick.saturating_sub(self.last_retarget_tick) > TINT_INTERVAL_TICKS {
            self.target_tint = [
                rng.random_range(10..=30) as f32,
                rng.random_range(10..=30) as f32,
                rng.random_range(20..=40) as f32,
            ];
            self.last_retarget_tick = now_tick;
        }
        for (c, t) in self.tint.iter_mut().zip(self.target_tint) {
            *c += (t - *c) * TINT_EASE;
        }

        let drift = scroll_speed * PARALLAX;
        for line in &mut self.lines {
            line.x -= line.speed * drift;
            if line.x + line.length < 0.0 {
                *line = DecorLine::random(rng, SCREEN_WIDTH);
            }
        }
        for shape in &mut self.shapes {
            shape.x -= shape.speed * drift;
            if shape.x + shape.size < 0.0 {
                *shape = DecorShape::random(rng, SCREEN_WIDTH);
            }
        }
    }

    /// Current tint quantized for drawing
    pub fn color(&self) -> Rgb {
        self.tint.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}
