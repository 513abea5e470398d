//! Countdown timer. Remaining time is reduced by the wall-clock distance
//! between ticks, so a late tick still subtracts the full interval.

use crate::format::format_duration;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountdownPhase {
    Unconfigured,
    Running,
    Paused,
    Expired,
}

/// Result of the shared start/pause control.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerToggle {
    /// Configured from the input fields and started.
    Started { configured_ms: u64 },
    Resumed,
    Paused,
    /// The configured total was zero or negative; nothing changed.
    Rejected,
    /// Time ran out while pausing.
    Expired,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountdownTick {
    /// Not running; nothing to do.
    Idle,
    Running { remaining_ms: u64 },
    Expired,
}

/// The three raw text fields the user types a duration into.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DurationInput {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl DurationInput {
    pub fn new(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self {
            hours: hours.to_string(),
            minutes: minutes.to_string(),
            seconds: seconds.to_string(),
        }
    }

    /// Split a preset of the form "SS", "MM:SS" or "HH:MM:SS" into fields.
    /// Every part must be a plain non-negative number.
    pub fn from_preset(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
            return None;
        }
        match parts.as_slice() {
            [s] => Some(Self::new("", "", s)),
            [m, s] => Some(Self::new("", m, s)),
            [h, m, s] => Some(Self::new(h, m, s)),
            _ => None,
        }
    }

    /// Total in milliseconds. Unparseable fields count as zero; the result
    /// may be zero or negative, which callers treat as "not configured".
    pub fn total_ms(&self) -> i64 {
        let h = parse_leading_int(&self.hours);
        let m = parse_leading_int(&self.minutes);
        let s = parse_leading_int(&self.seconds);
        h.saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(s)
            .saturating_mul(1000)
    }
}

/// Integer value of the leading `[+-]digits` run after optional whitespace,
/// or 0 when there is none.
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }
    if negative {
        -value
    } else {
        value
    }
}

pub struct Countdown {
    phase: CountdownPhase,
    remaining_ms: u64,
    configured_ms: u64,
    last_tick_ms: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            phase: CountdownPhase::Unconfigured,
            remaining_ms: 0,
            configured_ms: 0,
            last_tick_ms: 0,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == CountdownPhase::Running
    }

    /// Start when unconfigured or expired (reading `input`), resume when
    /// paused, pause when running.
    pub fn toggle(&mut self, now_ms: u64, input: &DurationInput) -> TimerToggle {
        match self.phase {
            CountdownPhase::Unconfigured | CountdownPhase::Expired => {
                let total = input.total_ms();
                if total <= 0 {
                    return TimerToggle::Rejected;
                }
                let total = total as u64;
                self.configured_ms = total;
                self.remaining_ms = total;
                self.last_tick_ms = now_ms;
                self.phase = CountdownPhase::Running;
                TimerToggle::Started { configured_ms: total }
            }
            CountdownPhase::Paused => {
                self.last_tick_ms = now_ms;
                self.phase = CountdownPhase::Running;
                TimerToggle::Resumed
            }
            CountdownPhase::Running => {
                if self.tick(now_ms) == CountdownTick::Expired {
                    return TimerToggle::Expired;
                }
                self.phase = CountdownPhase::Paused;
                TimerToggle::Paused
            }
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> CountdownTick {
        if self.phase != CountdownPhase::Running {
            return CountdownTick::Idle;
        }
        let delta = now_ms.saturating_sub(self.last_tick_ms);
        self.last_tick_ms = now_ms;
        self.remaining_ms = self.remaining_ms.saturating_sub(delta);
        if self.remaining_ms == 0 {
            self.phase = CountdownPhase::Expired;
            return CountdownTick::Expired;
        }
        CountdownTick::Running {
            remaining_ms: self.remaining_ms,
        }
    }

    /// Return to unconfigured from any state. Returns false when already
    /// unconfigured.
    pub fn reset(&mut self) -> bool {
        if self.phase == CountdownPhase::Unconfigured {
            return false;
        }
        self.phase = CountdownPhase::Unconfigured;
        self.remaining_ms = 0;
        self.configured_ms = 0;
        self.last_tick_ms = 0;
        true
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn configured_ms(&self) -> u64 {
        self.configured_ms
    }

    /// Whether the input fields (rather than the countdown) are on screen.
    pub fn shows_input(&self) -> bool {
        self.phase == CountdownPhase::Unconfigured
    }

    pub fn display(&self) -> String {
        format_duration(self.remaining_ms as i64, false)
    }

    /// Fraction of the configured duration already used, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.configured_ms == 0 {
            return 0.0;
        }
        let used = self.configured_ms - self.remaining_ms;
        used as f64 / self.configured_ms as f64
    }

    pub fn control_label(&self) -> &'static str {
        match self.phase {
            CountdownPhase::Running => "Pause",
            CountdownPhase::Paused => "Resume",
            CountdownPhase::Unconfigured | CountdownPhase::Expired => "Start",
        }
    }
}
