//! Frame pacing
//!
//! The display callback runs at whatever rate the host gives us; the
//! simulation always advances in whole [`SIM_DT`] ticks.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; the first call reports one tick
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time_ms = Some(now_ms);
        dt.max(0.0)
    }

    /// Feed a frame delta and return how many ticks to run now.
    ///
    /// Deltas are capped at [`MAX_FRAME_DT`] and at most [`MAX_SUBSTEPS`]
    /// ticks run per frame; any excess backlog is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Forget any partial tick (after a restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Rolling FPS over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Calculate FPS from oldest to newest frame
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_frames_run_one_tick() {
        let mut clock = FrameClock::new();
        let ticks: u32 = (0..120).map(|_| clock.advance(SIM_DT)).sum();
        assert!((119..=120).contains(&ticks));
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(3.0), MAX_SUBSTEPS);
        // Backlog does not carry over
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_fast_display_accumulates() {
        let mut clock = FrameClock::new();
        let half = SIM_DT / 2.0 + 1e-5;
        assert_eq!(clock.advance(half), 0);
        assert_eq!(clock.advance(half), 1);
    }

    #[test]
    fn test_delta_from_timestamps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1_000.0), SIM_DT);
        assert!((clock.delta(1_050.0) - 0.05).abs() < 1e-6);
        // Clock going backwards never yields negative time
        assert_eq!(clock.delta(900.0), 0.0);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(fps.fps(), 60);
    }
}
