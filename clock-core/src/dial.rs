//! Analog dial geometry: fractional hand positions, hand angles and the
//! seconds arc.

use chrono::{DateTime, TimeZone, Timelike};

use crate::format::{format_clock_strings, ClockStrings};

/// Radius of the seconds arc, in the dial's drawing units.
pub const ARC_RADIUS: f64 = 75.0;
pub const ARC_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * ARC_RADIUS;

/// Hand rotations in degrees, clockwise from twelve o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

/// Everything the clock face shows for one refresh. Recomputed on every
/// refresh and never stored beyond it.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockSnapshot {
    /// Seconds including the millisecond fraction, in [0, 60).
    pub sec_frac: f64,
    /// Minutes including the second fraction, in [0, 60).
    pub min_frac: f64,
    /// Hours on the 12-hour dial including the minute fraction, in [0, 12).
    pub hour_frac: f64,
    pub strings: ClockStrings,
}

impl ClockSnapshot {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        // Leap seconds report nanoseconds past 1e9; keep the fraction below 1s.
        let millis = (now.nanosecond() / 1_000_000).min(999);
        let (sec_frac, min_frac, hour_frac) =
            fractions(now.hour(), now.minute(), now.second(), millis);
        Self {
            sec_frac,
            min_frac,
            hour_frac,
            strings: format_clock_strings(now),
        }
    }

    pub fn hands(&self) -> HandAngles {
        HandAngles {
            hour: self.hour_frac * 30.0,
            minute: self.min_frac * 6.0,
            second: self.sec_frac * 6.0,
        }
    }

    /// Fraction of the current minute elapsed, in [0, 1).
    pub fn arc_progress(&self) -> f64 {
        self.sec_frac / 60.0
    }

    /// Stroke offset of the seconds arc against [`ARC_CIRCUMFERENCE`]: the
    /// full circumference at the top of the minute, shrinking towards zero.
    pub fn arc_offset(&self) -> f64 {
        ARC_CIRCUMFERENCE * (1.0 - self.arc_progress())
    }
}

fn fractions(hour: u32, minute: u32, second: u32, millis: u32) -> (f64, f64, f64) {
    let sec_frac = second as f64 + millis as f64 / 1000.0;
    let min_frac = minute as f64 + sec_frac / 60.0;
    let hour_frac = (hour % 12) as f64 + min_frac / 60.0;
    (sec_frac, min_frac, hour_frac)
}
