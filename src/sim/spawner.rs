//! Obstacle spawning and the difficulty ramp

use rand::Rng;

use super::palette::{OBSTACLE_COLORS, pick};
use super::state::{Obstacle, ObstacleShape, Session, SpeedNotice};
use crate::consts::*;

/// Whether spacing and cooldown both allow a new obstacle this tick
pub fn can_spawn(session: &Session) -> bool {
    let spaced = session
        .obstacles
        .last()
        .is_none_or(|last| last.x < SCREEN_WIDTH - MIN_OBSTACLE_SPACING);
    let cooled = session.elapsed_ticks.saturating_sub(session.last_spawn_tick)
        > session.spawn_cooldown_ticks;
    spaced && cooled
}

/// Random shape within the configured size ranges
pub fn random_shape<R: Rng + ?Sized>(rng: &mut R) -> ObstacleShape {
    if rng.random_bool(BLOCK_CHANCE) {
        ObstacleShape::Block {
            width: rng.random_range(BLOCK_WIDTH_RANGE.0..=BLOCK_WIDTH_RANGE.1) as f32,
            height: rng.random_range(BLOCK_HEIGHT_RANGE.0..=BLOCK_HEIGHT_RANGE.1) as f32,
        }
    } else {
        ObstacleShape::Spike {
            size: rng.random_range(SPIKE_SIZE_RANGE.0..=SPIKE_SIZE_RANGE.1) as f32,
        }
    }
}

/// Spawn one obstacle at the right edge if the gate is open.
/// Returns the new obstacle's id.
pub fn maybe_spawn(session: &mut Session) -> Option<u32> {
    if !can_spawn(session) {
        return None;
    }

    let shape = random_shape(&mut session.rng);
    let color = pick(&mut session.rng, &OBSTACLE_COLORS);
    let pulse = session.rng.random_range(0.0..std::f32::consts::TAU);
    let id = session.next_entity_id();
    session
        .obstacles
        .push(Obstacle::new(id, SCREEN_WIDTH, shape, color, pulse));

    session.last_spawn_tick = session.elapsed_ticks;
    session.spawn_cooldown_ticks = session
        .rng
        .random_range(SPAWN_COOLDOWN_TICKS.0..=SPAWN_COOLDOWN_TICKS.1);

    log::debug!("Spawned obstacle {} ({:?}) at tick {}", id, shape, session.elapsed_ticks);
    Some(id)
}

/// Step the scroll speed up once per interval until the cap.
/// Returns the new speed when it changed.
pub fn apply_speed_ramp(session: &mut Session) -> Option<f32> {
    if session.elapsed_ticks - session.last_speed_up_tick < SPEED_UP_INTERVAL_TICKS {
        return None;
    }
    if session.speed >= MAX_SPEED {
        return None;
    }

    session.speed = (session.speed + SPEED_STEP).min(MAX_SPEED);
    session.last_speed_up_tick = session.elapsed_ticks;
    session.speed_notice = Some(SpeedNotice {
        shown_at_tick: session.clock_ticks,
    });
    Some(session.speed)
}
