//! Game context: one running session plus its audio, settings and pacing
//!
//! Owned by the entry point and driven once per display frame.

use rand::Rng;

use crate::audio::{AudioDirector, SoundEffect};
use crate::platform::{FpsCounter, FrameClock, InputEvent};
use crate::renderer::{DrawCmd, build_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, Session, TickInput, tick};

/// What the host should do after a frame
#[derive(Debug)]
pub enum FrameOutcome {
    /// Draw this and keep going
    Continue(Vec<DrawCmd>),
    Quit,
}

pub struct Game {
    session: Session,
    audio: AudioDirector,
    settings: Settings,
    clock: FrameClock,
    fps: FpsCounter,
    /// One-shot inputs waiting for the next tick
    input: TickInput,
}

impl Game {
    pub fn new(seed: u64, audio: AudioDirector, settings: Settings) -> Self {
        let mut game = Self {
            session: Session::new(seed),
            audio,
            settings,
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            input: TickInput::default(),
        };
        game.audio.apply_settings(&game.settings);
        log::info!("Game initialized with seed: {}", seed);
        game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio_mut(&mut self) -> &mut AudioDirector {
        &mut self.audio
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.audio.apply_settings(&self.settings);
    }

    /// Begin music and the beat clock for the first run
    pub fn start(&mut self, now_ms: f64) {
        self.audio.start_loop(now_ms);
    }

    /// Tear down the current run and begin a fresh one
    pub fn restart(&mut self, now_ms: f64) {
        let final_score = self.session.total_score();
        self.audio.stop_loop();
        let seed = self.session.rng.random();
        self.session = Session::new(seed);
        self.clock.reset();
        self.input = TickInput::default();
        self.audio.start_loop(now_ms);
        log::info!("Game restarted with seed: {} (previous score {})", seed, final_score);
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
            GameEvent::SpeedUp(_) => self.audio.play(SoundEffect::SpeedUp),
            GameEvent::Crashed => {
                self.audio.play(SoundEffect::Crash);
                log::info!(
                    "Game over: score {} in {:.1}s",
                    self.session.total_score(),
                    self.session.elapsed_secs()
                );
            }
            GameEvent::ObstacleCleared => {}
        }
    }

    /// Advance by one display frame.
    ///
    /// `dt` is the real frame delta in seconds; `events` are the inputs
    /// collected since the previous frame.
    pub fn frame(&mut self, now_ms: f64, dt: f32, events: &[InputEvent]) -> FrameOutcome {
        self.fps.record(now_ms);

        for event in events {
            match event {
                InputEvent::Quit => {
                    log::info!("Quit requested");
                    self.audio.stop_loop();
                    return FrameOutcome::Quit;
                }
                InputEvent::Restart if self.session.phase == GamePhase::GameOver => {
                    self.restart(now_ms);
                }
                InputEvent::Jump if self.session.phase == GamePhase::Running => {
                    self.input.jump = true;
                }
                _ => {}
            }
        }

        let beat = self.audio.poll_beat(now_ms);
        if beat.occurred && self.settings.beat_flashes() {
            self.input.beat = Some(beat.count);
        }

        for _ in 0..self.clock.advance(dt) {
            let input = std::mem::take(&mut self.input);
            for event in tick(&mut self.session, &input) {
                self.handle_event(&event);
            }
        }

        FrameOutcome::Continue(build_frame(&self.session, &self.settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundBank;
    use crate::audio::sounds::MusicStyle;
    use crate::audio::sink::testing::{RecordingSink, SinkCall};
    use crate::consts::*;
    use crate::sim::{Obstacle, ObstacleShape};

    fn bank() -> SoundBank {
        SoundBank {
            jump: vec![1; 10],
            crash: vec![2; 20],
            speed_up: vec![3; 30],
            music_loop: vec![4; 40],
            music_style: MusicStyle::Classic,
        }
    }

    fn game() -> (Game, RecordingSink) {
        let sink = RecordingSink::default();
        let audio = AudioDirector::new(bank(), Some(Box::new(sink.clone())));
        let mut game = Game::new(42, audio, Settings::default());
        game.start(0.0);
        (game, sink)
    }

    fn crash(game: &mut Game, now_ms: f64) {
        let id = game.session.next_entity_id();
        game.session.obstacles.push(Obstacle::new(
            id,
            PLAYER_X,
            ObstacleShape::Block { width: 30.0, height: 40.0 },
            [255, 0, 128],
            0.0,
        ));
        game.frame(now_ms, SIM_DT, &[]);
    }

    fn plays(sink: &RecordingSink, len: usize) -> usize {
        sink.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SinkCall::PlayOnce { len: l, .. } if *l == len))
            .count()
    }

    #[test]
    fn test_jump_plays_sound_once() {
        let (mut game, sink) = game();
        game.frame(16.0, SIM_DT, &[InputEvent::Jump]);
        assert!(game.session().player.airborne);
        game.frame(32.0, SIM_DT, &[InputEvent::Jump]);
        assert_eq!(plays(&sink, 10), 1);
    }

    #[test]
    fn test_jump_waits_for_a_tick() {
        let (mut game, _) = game();
        // Too short a frame to run a tick; the jump is kept for the next one
        game.frame(1.0, SIM_DT / 4.0, &[InputEvent::Jump]);
        assert!(!game.session().player.airborne);
        game.frame(20.0, SIM_DT, &[]);
        assert!(game.session().player.airborne);
    }

    #[test]
    fn test_crash_plays_sound_and_keeps_music() {
        let (mut game, sink) = game();
        crash(&mut game, 16.0);
        assert!(game.session().is_game_over());
        assert_eq!(plays(&sink, 20), 1);
        assert!(game.audio.is_music_playing());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let (mut game, _) = game();
        for i in 1..=30 {
            game.session.obstacles.clear();
            game.frame(i as f64 * 16.0, SIM_DT, &[]);
        }
        let ticks = game.session().elapsed_ticks;
        game.frame(600.0, 0.0, &[InputEvent::Restart]);
        assert_eq!(game.session().elapsed_ticks, ticks);
    }

    #[test]
    fn test_restart_resets_run_and_loop() {
        let (mut game, sink) = game();
        game.session.clear_score = 7;
        game.session.speed = 8.0;
        crash(&mut game, 16.0);

        let outcome = game.frame(32.0, 0.0, &[InputEvent::Restart]);
        assert!(matches!(outcome, FrameOutcome::Continue(_)));
        let session = game.session();
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.clear_score, 0);
        assert_eq!(session.time_score, 0);
        assert_eq!(session.speed, INITIAL_SPEED);
        assert!(session.obstacles.is_empty());

        // Loop is stopped before the new one starts
        let calls = sink.calls.borrow();
        let n = calls.len();
        assert_eq!(calls[n - 2], SinkCall::StopLoop);
        assert!(matches!(calls[n - 1], SinkCall::StartLoop { .. }));
    }

    #[test]
    fn test_quit() {
        let (mut game, sink) = game();
        assert!(matches!(game.frame(16.0, SIM_DT, &[InputEvent::Quit]), FrameOutcome::Quit));
        assert_eq!(sink.calls.borrow().last(), Some(&SinkCall::StopLoop));
    }

    #[test]
    fn test_reduced_motion_withholds_beats() {
        let (mut game, _) = game();
        game.set_settings(Settings {
            reduced_motion: true,
            ..Default::default()
        });
        let color = game.session().player.color;
        // 40 beats at 500 ms, ten of them on a 4th count
        for i in 1..=40 {
            game.session.obstacles.clear();
            game.frame(i as f64 * 500.0, SIM_DT, &[]);
        }
        assert_eq!(game.session().player.color, color);
        assert_eq!(game.audio.poll_beat(20_000.0).count, 40);
    }

    #[test]
    fn test_silent_audio_still_runs() {
        let mut game = Game::new(1, AudioDirector::silent(bank()), Settings::default());
        game.start(0.0);
        assert!(matches!(game.frame(16.0, SIM_DT, &[InputEvent::Jump]), FrameOutcome::Continue(_)));
        assert!(game.session().player.airborne);
    }
}
