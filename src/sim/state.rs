//! Game state and core simulation types
//!
//! A `Session` is everything one run needs. It is created at startup and
//! fully replaced on restart; nothing here survives between runs.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::background::Background;
use super::palette::{PLAYER_COLOR, Rgb};
use crate::consts::*;
use crate::{ticks_to_secs, wrap_phase};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Collision happened; the world is frozen in its last pose
    GameOver,
}

/// Things that happened during a tick that the outside world reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player left the ground
    Jumped,
    /// Scroll speed stepped up to the contained value
    SpeedUp(f32),
    /// An obstacle scrolled off the left edge
    ObstacleCleared,
    /// Player hit an obstacle
    Crashed,
}

/// The player's square
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner; x stays in the lane
    pub pos: Vec2,
    pub size: f32,
    /// Vertical velocity (pixels/tick, positive is down)
    pub vel_y: f32,
    pub airborne: bool,
    /// Visual spin in degrees
    pub rotation: f32,
    /// Recent center positions, oldest first
    pub trail: VecDeque<Vec2>,
    pub color: Rgb,
    /// Glow pulse phase (radians)
    pub pulse: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, GROUND_Y - PLAYER_SIZE),
            size: PLAYER_SIZE,
            vel_y: 0.0,
            airborne: false,
            rotation: 0.0,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY),
            color: PLAYER_COLOR,
            pulse: 0.0,
        }
    }

    /// Highest y the top edge may take while standing on the ground
    #[inline]
    pub fn ground_level(&self) -> f32 {
        GROUND_Y - self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Start a jump. Returns false (and changes nothing) when already airborne.
    pub fn jump(&mut self) -> bool {
        if self.airborne {
            return false;
        }
        self.vel_y = JUMP_IMPULSE;
        self.airborne = true;
        true
    }

    /// Advance one fixed tick of gravity, landing, spin and trail
    pub fn update(&mut self) {
        self.vel_y += GRAVITY;
        self.pos.y += self.vel_y;

        let ground = self.ground_level();
        if self.pos.y > ground {
            self.pos.y = ground;
            self.vel_y = 0.0;
            self.airborne = false;
        }

        if self.airborne {
            self.rotation += ROTATION_STEP;
        } else {
            self.rotation = 0.0;
        }

        self.record_trail();
        self.pulse = wrap_phase(self.pulse + PLAYER_PULSE_STEP);
    }

    /// Push the current center, evicting the oldest point past capacity
    pub fn record_trail(&mut self) {
        if self.trail.len() >= TRAIL_CAPACITY {
            self.trail.pop_front();
        }
        self.trail.push_back(self.center());
    }
}

/// Obstacle silhouettes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleShape {
    Block { width: f32, height: f32 },
    Spike { size: f32 },
}

impl ObstacleShape {
    #[inline]
    pub fn width(&self) -> f32 {
        match *self {
            ObstacleShape::Block { width, .. } => width,
            ObstacleShape::Spike { size } => size,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        match *self {
            ObstacleShape::Block { height, .. } => height,
            ObstacleShape::Spike { size } => size,
        }
    }
}

/// A ground obstacle scrolling toward the player
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub shape: ObstacleShape,
    pub color: Rgb,
    /// Left edge; the only coordinate that changes after spawn
    pub x: f32,
    /// Top edge, fixed so the bottom rests on the ground line
    pub y: f32,
    /// Glow pulse phase (radians)
    pub pulse: f32,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, shape: ObstacleShape, color: Rgb, pulse: f32) -> Self {
        Self {
            id,
            shape,
            color,
            x,
            y: GROUND_Y - shape.height(),
            pulse,
        }
    }

    /// Scroll left by the current speed
    pub fn update(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed;
        self.pulse = wrap_phase(self.pulse + OBSTACLE_PULSE_STEP);
    }

    /// Past the left edge far enough to remove without visible popping
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.x < OFF_SCREEN_X
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.shape.height()
    }
}

/// Timed "Speed Up!" banner, measured on the session clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedNotice {
    pub shown_at_tick: u64,
}

impl SpeedNotice {
    pub fn is_visible(&self, now_tick: u64) -> bool {
        now_tick.saturating_sub(self.shown_at_tick) < SPEED_NOTICE_TICKS
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct Session {
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Current scroll speed (pixels/tick)
    pub speed: f32,
    /// Ticks spent Running
    pub elapsed_ticks: u64,
    /// Every tick since the session began, GameOver included
    pub clock_ticks: u64,
    /// Points from elapsed time
    pub time_score: u64,
    /// Points from obstacles that scrolled past
    pub clear_score: u64,
    pub last_spawn_tick: u64,
    /// Cooldown drawn when the last obstacle spawned
    pub spawn_cooldown_ticks: u64,
    pub last_speed_up_tick: u64,
    pub speed_notice: Option<SpeedNotice>,
    /// Ambient scenery (no gameplay effect)
    pub background: Background,
    next_id: u32,
}

impl Session {
    /// Create a fresh run with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let background = Background::new(&mut rng);
        Self {
            rng,
            phase: GamePhase::Running,
            player: Player::new(),
            obstacles: Vec::new(),
            speed: INITIAL_SPEED,
            elapsed_ticks: 0,
            clock_ticks: 0,
            time_score: 0,
            clear_score: 0,
            last_spawn_tick: 0,
            spawn_cooldown_ticks: SPAWN_COOLDOWN_TICKS.0,
            last_speed_up_tick: 0,
            speed_notice: None,
            background,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Survival time in seconds
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        ticks_to_secs(self.elapsed_ticks)
    }

    /// Displayed score
    #[inline]
    pub fn total_score(&self) -> u64 {
        self.clear_score + self.time_score
    }

    /// Speed relative to the starting speed, for the HUD
    #[inline]
    pub fn speed_multiplier(&self) -> f32 {
        self.speed / INITIAL_SPEED
    }

    pub fn speed_notice_visible(&self) -> bool {
        self.speed_notice
            .is_some_and(|n| n.is_visible(self.clock_ticks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_lands_and_resets() {
        let mut player = Player::new();
        assert!(player.jump());
        player.update();
        assert!(player.airborne);
        assert!(player.pos.y < player.ground_level());
        assert_eq!(player.rotation, ROTATION_STEP);

        let mut landed = false;
        for _ in 0..200 {
            player.update();
            assert!(player.pos.y <= player.ground_level());
            if !player.airborne {
                landed = true;
                assert_eq!(player.vel_y, 0.0);
                assert_eq!(player.rotation, 0.0);
                assert_eq!(player.pos.y, player.ground_level());
                break;
            }
        }
        assert!(landed, "player never landed");
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let mut player = Player::new();
        player.jump();
        player.update();
        let vel = player.vel_y;
        assert!(!player.jump());
        assert_eq!(player.vel_y, vel);
        assert!(player.airborne);
    }

    #[test]
    fn test_trail_is_bounded_fifo() {
        let mut player = Player::new();
        player.jump();
        for _ in 0..TRAIL_CAPACITY + 5 {
            player.update();
        }
        assert_eq!(player.trail.len(), TRAIL_CAPACITY);
        assert_eq!(player.trail.back().copied(), Some(player.center()));
    }

    #[test]
    fn test_obstacle_rests_on_ground() {
        let shape = ObstacleShape::Block { width: 30.0, height: 45.0 };
        let block = Obstacle::new(1, 800.0, shape, [0; 3], 0.0);
        let spike = Obstacle::new(2, 800.0, ObstacleShape::Spike { size: 25.0 }, [0; 3], 0.0);
        assert_eq!(block.bottom(), GROUND_Y);
        assert_eq!(spike.bottom(), GROUND_Y);
    }

    #[test]
    fn test_obstacle_scrolls_and_leaves() {
        let shape = ObstacleShape::Spike { size: 20.0 };
        let mut obstacle = Obstacle::new(1, -40.0, shape, [0; 3], 0.0);
        obstacle.update(5.0);
        assert_eq!(obstacle.x, -45.0);
        obstacle.update(5.0);
        assert_eq!(obstacle.x, -50.0);
        assert!(!obstacle.is_off_screen());
        obstacle.update(5.0);
        assert!(obstacle.is_off_screen());
        obstacle.update(5.0);
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn test_fresh_session() {
        let session = Session::new(7);
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.speed, INITIAL_SPEED);
        assert_eq!(session.total_score(), 0);
        assert!(session.obstacles.is_empty());
        assert!(!session.speed_notice_visible());
    }
}
