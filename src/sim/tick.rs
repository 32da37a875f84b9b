//! Fixed timestep simulation tick
//!
//! Core game loop step that advances a session by exactly one tick.

use super::collision::check_collision;
use super::palette::{NEON_COLORS, pick};
use super::spawner::{apply_speed_ramp, maybe_spawn};
use super::state::{GameEvent, GamePhase, Session};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key went down since the last tick
    pub jump: bool,
    /// Beat count, when the music clock reported a beat this frame
    pub beat: Option<u64>,
}

/// Advance the session by one fixed tick, returning what happened
pub fn tick(state: &mut Session, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let beat = input.beat.is_some();
    state.clock_ticks += 1;

    if state.phase == GamePhase::GameOver {
        // Scenery keeps drifting behind the overlay; the world stays frozen
        let speed = state.speed;
        let now = state.clock_ticks;
        state.background.update(&mut state.rng, speed, now, beat);
        return events;
    }

    state.elapsed_ticks += 1;
    state.time_score = state.elapsed_ticks * TIME_SCORE_PER_SECOND / TICK_RATE as u64;

    if let Some(speed) = apply_speed_ramp(state) {
        log::info!("Speed up to {:.1} at {:.1}s", speed, state.elapsed_secs());
        events.push(GameEvent::SpeedUp(speed));
    }

    // Re-theme the player on every 4th beat
    if input.beat.is_some_and(|count| count % 4 == 0) {
        state.player.color = pick(&mut state.rng, &NEON_COLORS);
    }

    let speed = state.speed;
    let now = state.clock_ticks;
    state.background.update(&mut state.rng, speed, now, beat);

    if input.jump && state.player.jump() {
        events.push(GameEvent::Jumped);
    }
    state.player.update();

    maybe_spawn(state);

    for obstacle in &mut state.obstacles {
        obstacle.update(speed);
    }
    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_off_screen());
    let cleared = before - state.obstacles.len();
    state.clear_score += cleared as u64;
    events.extend(std::iter::repeat_n(GameEvent::ObstacleCleared, cleared));

    if let Some(hit) = state
        .obstacles
        .iter()
        .find(|o| check_collision(&state.player, o))
    {
        log::info!(
            "Crashed into obstacle {} after {:.1}s, score {}",
            hit.id,
            state.elapsed_secs(),
            state.total_score()
        );
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::Crashed);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleShape};
    use proptest::prelude::*;

    /// Tick with obstacles removed so the run never ends
    fn survive(state: &mut Session, ticks: u64) {
        for _ in 0..ticks {
            state.obstacles.clear();
            tick(state, &TickInput::default());
        }
    }

    #[test]
    fn test_time_score_accrues() {
        let mut state = Session::new(12345);
        survive(&mut state, 90);
        assert_eq!(state.elapsed_ticks, 90);
        assert_eq!(state.time_score, 3);
        assert_eq!(state.total_score(), 3);
    }

    #[test]
    fn test_speed_ramp_over_time() {
        let mut state = Session::new(12345);
        survive(&mut state, SPEED_UP_INTERVAL_TICKS - 1);
        assert_eq!(state.speed, INITIAL_SPEED);

        state.obstacles.clear();
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.elapsed_secs(), 15.0);
        assert_eq!(state.speed, 5.5);
        assert!(events.contains(&GameEvent::SpeedUp(5.5)));
        assert!(state.speed_notice_visible());

        survive(&mut state, SPEED_NOTICE_TICKS);
        assert!(!state.speed_notice_visible());

        survive(&mut state, SPEED_UP_INTERVAL_TICKS - SPEED_NOTICE_TICKS);
        assert_eq!(state.elapsed_secs(), 30.0);
        assert_eq!(state.speed, 6.0);
    }

    #[test]
    fn test_retire_off_screen_obstacle() {
        let mut state = Session::new(1);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(
            id,
            -51.0,
            ObstacleShape::Block { width: 20.0, height: 20.0 },
            [255, 255, 0],
            0.0,
        ));
        assert!(state.obstacles[0].is_off_screen());
        assert_eq!(state.clear_score, 0);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.clear_score, 1);
        assert!(state.obstacles.is_empty());
        assert!(events.contains(&GameEvent::ObstacleCleared));
    }

    #[test]
    fn test_jump_input_is_edge_reported() {
        let mut state = Session::new(1);
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        assert!(events.contains(&GameEvent::Jumped));
        assert!(state.player.airborne);

        // Holding jump mid-air does nothing more
        let events = tick(&mut state, &input);
        assert!(!events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_collision_freezes_world() {
        let mut state = Session::new(1);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(
            id,
            PLAYER_X + 10.0,
            ObstacleShape::Block { width: 30.0, height: 40.0 },
            [255, 0, 128],
            0.0,
        ));
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(events.last(), Some(&GameEvent::Crashed));

        let ticks = state.elapsed_ticks;
        let x = state.obstacles[0].x;
        let score = state.total_score();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        for _ in 0..120 {
            assert!(tick(&mut state, &jump).is_empty());
        }
        assert_eq!(state.elapsed_ticks, ticks);
        assert_eq!(state.obstacles[0].x, x);
        assert_eq!(state.total_score(), score);
        assert!(!state.player.airborne);
    }

    #[test]
    fn test_speed_banner_expires_during_game_over() {
        let mut state = Session::new(12345);
        survive(&mut state, SPEED_UP_INTERVAL_TICKS);
        assert!(state.speed_notice_visible());

        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(
            id,
            PLAYER_X + 10.0,
            ObstacleShape::Block { width: 30.0, height: 40.0 },
            [255, 0, 128],
            0.0,
        ));
        tick(&mut state, &TickInput::default());
        assert!(state.is_game_over());
        assert!(state.speed_notice_visible());

        let frozen = state.elapsed_ticks;
        for _ in 0..SPEED_NOTICE_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.elapsed_ticks, frozen);
        assert!(!state.speed_notice_visible());
    }

    #[test]
    fn test_fourth_beat_rethemes_player() {
        let mut state = Session::new(5);
        let before = state.player.color;
        let mut changed = false;
        for _ in 0..20 {
            state.obstacles.clear();
            tick(&mut state, &TickInput { jump: false, beat: Some(4) });
            if state.player.color != before {
                changed = true;
                break;
            }
        }
        assert!(changed);

        let color = state.player.color;
        state.obstacles.clear();
        tick(&mut state, &TickInput { jump: false, beat: Some(3) });
        assert_eq!(state.player.color, color);
    }

    #[test]
    fn test_determinism() {
        let mut a = Session::new(99999);
        let mut b = Session::new(99999);
        for i in 0..600u64 {
            let input = TickInput {
                jump: i % 45 == 0,
                beat: (i % 30 == 0).then_some(i / 30),
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.elapsed_ticks, b.elapsed_ticks);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.player.pos, b.player.pos);
    }

    proptest! {
        #[test]
        fn prop_player_never_below_ground(
            jumps in proptest::collection::vec(any::<bool>(), 1..400)
        ) {
            let mut state = Session::new(7);
            for jump in jumps {
                state.obstacles.clear();
                let was_airborne = state.player.airborne;
                tick(&mut state, &TickInput { jump, beat: None });
                prop_assert!(state.player.pos.y <= state.player.ground_level());
                if was_airborne && !state.player.airborne {
                    prop_assert_eq!(state.player.vel_y, 0.0);
                }
            }
        }

        #[test]
        fn prop_speed_monotonic_and_bounded(ticks in 1u64..20_000) {
            let mut state = Session::new(3);
            let mut last = state.speed;
            let mut remaining = ticks;
            while remaining > 0 {
                // Jump straight to shortly before the next interval boundary
                let step = remaining.min(SPEED_UP_INTERVAL_TICKS);
                state.elapsed_ticks += step - 1;
                state.obstacles.clear();
                tick(&mut state, &TickInput::default());
                prop_assert!(state.speed >= last);
                prop_assert!(state.speed <= MAX_SPEED);
                last = state.speed;
                remaining -= step;
            }
        }
    }
}
