//! Music beat clock

/// Result of one [`BeatClock::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeatPoll {
    pub occurred: bool,
    /// Beats reported so far, including this one
    pub count: u64,
}

/// Tracks beat boundaries against a wall clock in milliseconds.
///
/// One poll reports at most one beat; when polls come late the boundary
/// still advances by whole intervals so the phase never drifts.
#[derive(Debug, Clone)]
pub struct BeatClock {
    interval_ms: f64,
    last_beat_ms: f64,
    beat_count: u64,
    running: bool,
}

impl BeatClock {
    pub fn new(bpm: f64) -> Self {
        Self {
            interval_ms: 60_000.0 / bpm,
            last_beat_ms: 0.0,
            beat_count: 0,
            running: false,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn beat_count(&self) -> u64 {
        self.beat_count
    }

    /// Restart from zero with the next beat one interval after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.last_beat_ms = now_ms;
        self.beat_count = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn poll(&mut self, now_ms: f64) -> BeatPoll {
        if !self.running {
            return BeatPoll {
                occurred: false,
                count: self.beat_count,
            };
        }

        let elapsed = now_ms - self.last_beat_ms;
        if elapsed < self.interval_ms {
            return BeatPoll {
                occurred: false,
                count: self.beat_count,
            };
        }

        self.last_beat_ms += (elapsed / self.interval_ms).floor() * self.interval_ms;
        self.beat_count += 1;
        BeatPoll {
            occurred: true,
            count: self.beat_count,
        }
    }
}
