//! Stopwatch with laps. Elapsed time is always derived from the distance
//! between `now` and a start anchor, never from counting ticks.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StopwatchPhase {
    Idle,
    Running,
    Paused,
}

/// Result of the shared start/pause control.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StopwatchToggle {
    Started,
    Paused,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lap {
    /// 1-based lap number.
    pub index: u32,
    pub duration_ms: u64,
    pub cumulative_ms: u64,
}

pub struct Stopwatch {
    phase: StopwatchPhase,
    anchor_ms: u64,
    elapsed_ms: u64,
    last_lap_elapsed_ms: u64,
    laps: Vec<Lap>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            phase: StopwatchPhase::Idle,
            anchor_ms: 0,
            elapsed_ms: 0,
            last_lap_elapsed_ms: 0,
            laps: Vec::new(),
        }
    }

    pub fn phase(&self) -> StopwatchPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == StopwatchPhase::Running
    }

    /// Start (or resume) when stopped, pause when running.
    pub fn toggle(&mut self, now_ms: u64) -> StopwatchToggle {
        match self.phase {
            StopwatchPhase::Idle | StopwatchPhase::Paused => {
                self.anchor_ms = now_ms.saturating_sub(self.elapsed_ms);
                self.phase = StopwatchPhase::Running;
                StopwatchToggle::Started
            }
            StopwatchPhase::Running => {
                self.tick(now_ms);
                self.phase = StopwatchPhase::Paused;
                StopwatchToggle::Paused
            }
        }
    }

    /// Recompute elapsed time while running. Returns the current elapsed time.
    pub fn tick(&mut self, now_ms: u64) -> u64 {
        if self.phase == StopwatchPhase::Running {
            // A clock read that lands before the previous one never moves
            // the display backwards.
            self.elapsed_ms = self.elapsed_ms.max(now_ms.saturating_sub(self.anchor_ms));
        }
        self.elapsed_ms
    }

    /// Record a lap. Only valid while running; otherwise nothing happens.
    pub fn lap(&mut self, now_ms: u64) -> Option<Lap> {
        if self.phase != StopwatchPhase::Running {
            return None;
        }
        let elapsed = self.tick(now_ms);
        let lap = Lap {
            index: self.laps.len() as u32 + 1,
            duration_ms: elapsed - self.last_lap_elapsed_ms,
            cumulative_ms: elapsed,
        };
        self.last_lap_elapsed_ms = elapsed;
        self.laps.push(lap);
        Some(lap)
    }

    /// Clear back to idle. Refused while running; pause first.
    pub fn reset(&mut self) -> bool {
        if self.phase == StopwatchPhase::Running {
            return false;
        }
        self.phase = StopwatchPhase::Idle;
        self.anchor_ms = 0;
        self.elapsed_ms = 0;
        self.last_lap_elapsed_ms = 0;
        self.laps.clear();
        true
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Laps in recording order.
    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn laps_recent_first(&self) -> impl Iterator<Item = &Lap> {
        self.laps.iter().rev()
    }

    /// Label for the shared start/pause control.
    pub fn control_label(&self) -> &'static str {
        match self.phase {
            StopwatchPhase::Idle => "Start",
            StopwatchPhase::Running => "Pause",
            StopwatchPhase::Paused => "Resume",
        }
    }
}
