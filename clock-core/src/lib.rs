//! Pure timekeeping logic with no platform dependencies.
//! Every operation takes the current instant as an argument, so the whole
//! crate is testable on a simulated clock.

pub mod countdown;
pub mod dial;
pub mod format;
pub mod stopwatch;
pub mod tabs;

pub use countdown::{Countdown, CountdownPhase, CountdownTick, DurationInput, TimerToggle};
pub use dial::{ClockSnapshot, HandAngles, ARC_CIRCUMFERENCE, ARC_RADIUS};
pub use format::{format_clock_strings, format_duration, ClockStrings};
pub use stopwatch::{Lap, Stopwatch, StopwatchPhase, StopwatchToggle};
pub use tabs::{Tab, TabSelector, UnknownTab};
