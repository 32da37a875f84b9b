//! Cube Runner - A neon side-scrolling reflex arcade game
//!
//! Core modules:
//! - `sim`: Fixed timestep simulation (player physics, obstacles, spawning, scoring)
//! - `audio`: Waveform synthesis, sound bank, beat clock and playback direction
//! - `renderer`: Draw list construction and the WebGPU triangle pipeline
//! - `platform`: Input mapping and frame pacing
//! - `game`: The context object tying everything together each frame

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{FrameOutcome, Game};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical screen dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 400.0;
    /// Top of the ground band
    pub const GROUND_Y: f32 = SCREEN_HEIGHT - 50.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 35.0;
    pub const PLAYER_X: f32 = 100.0;
    pub const GRAVITY: f32 = 0.8;
    pub const JUMP_IMPULSE: f32 = -18.0;
    /// Degrees of spin per airborne tick
    pub const ROTATION_STEP: f32 = 5.0;
    pub const TRAIL_CAPACITY: usize = 10;
    pub const PLAYER_PULSE_STEP: f32 = 0.1;
    /// Hitbox inset on every side of the player box
    pub const FORGIVENESS_MARGIN: f32 = 2.0;

    /// Scroll speed (pixels per tick)
    pub const INITIAL_SPEED: f32 = 5.0;
    pub const MAX_SPEED: f32 = 12.0;
    pub const SPEED_STEP: f32 = 0.5;
    pub const SPEED_UP_INTERVAL_TICKS: u64 = 15 * TICK_RATE as u64;
    pub const SPEED_NOTICE_TICKS: u64 = 2 * TICK_RATE as u64;

    /// Obstacles
    pub const MIN_OBSTACLE_SPACING: f32 = 300.0;
    /// Spawn cooldown range in ticks (1.5s - 2.5s)
    pub const SPAWN_COOLDOWN_TICKS: (u64, u64) = (90, 150);
    pub const BLOCK_CHANCE: f64 = 0.7;
    pub const BLOCK_WIDTH_RANGE: (u32, u32) = (20, 40);
    pub const BLOCK_HEIGHT_RANGE: (u32, u32) = (20, 60);
    pub const SPIKE_SIZE_RANGE: (u32, u32) = (20, 40);
    pub const OFF_SCREEN_X: f32 = -50.0;
    pub const OBSTACLE_PULSE_STEP: f32 = 0.05;

    /// Points per elapsed second
    pub const TIME_SCORE_PER_SECOND: u64 = 2;
}

/// Wrap a phase accumulator into [0, 2π)
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    phase.rem_euclid(std::f32::consts::TAU)
}

/// Convert whole simulation ticks to seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 / consts::TICK_RATE as f32
}
