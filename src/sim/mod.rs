//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed tick per call, counted in whole ticks
//! - Seeded RNG only
//! - Spawn order preserved for spacing checks
//! - No rendering, audio or platform dependencies

pub mod background;
pub mod collision;
pub mod palette;
pub mod spawner;
pub mod state;
pub mod tick;

pub use background::{Background, DecorKind};
pub use collision::{Rect, check_collision, obstacle_hitbox, player_hitbox};
pub use spawner::{apply_speed_ramp, can_spawn, maybe_spawn};
pub use state::{GameEvent, GamePhase, Obstacle, ObstacleShape, Player, Session, SpeedNotice};
pub use tick::{TickInput, tick};
