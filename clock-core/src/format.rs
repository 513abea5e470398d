use chrono::{DateTime, Offset, TimeZone, Timelike};

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// Display strings for the clock face, derived from a single instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockStrings {
    /// 12-hour "HH:MM:SS"
    pub digital: String,
    pub ampm: &'static str,
    pub weekday: String,
    /// "DD Mon YYYY"
    pub date: String,
    /// "UTC±HH:MM"
    pub utc_offset: String,
}

/// Format milliseconds as "HH:MM:SS", or "HH:MM:SS.mmm" with `with_millis`.
/// Negative durations clamp to zero. Hours are not wrapped at 24.
pub fn format_duration(ms: i64, with_millis: bool) -> String {
    let ms = ms.max(0);
    let h = ms / MS_PER_HOUR;
    let m = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let s = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    if with_millis {
        format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms % MS_PER_SECOND)
    } else {
        format!("{:02}:{:02}:{:02}", h, m, s)
    }
}

/// Hour of day (0-23) on a 12-hour dial, where both midnight and noon read 12.
pub fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

pub fn meridiem(hour: u32) -> &'static str {
    if hour < 12 {
        "AM"
    } else {
        "PM"
    }
}

/// Format an offset east of UTC, in seconds, as "UTC+HH:MM".
pub fn format_utc_offset(offset_secs: i32) -> String {
    let minutes = offset_secs / 60;
    let sign = if minutes >= 0 { '+' } else { '-' };
    let abs = minutes.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

pub fn format_clock_strings<Tz: TimeZone>(now: &DateTime<Tz>) -> ClockStrings
where
    Tz::Offset: std::fmt::Display,
{
    let hour = now.hour();
    ClockStrings {
        digital: format!("{:02}:{:02}:{:02}", hour12(hour), now.minute(), now.second()),
        ampm: meridiem(hour),
        weekday: now.format("%A").to_string(),
        date: now.format("%d %b %Y").to_string(),
        utc_offset: format_utc_offset(now.offset().fix().local_minus_utc()),
    }
}
