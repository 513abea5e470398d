use chrono::{FixedOffset, TimeZone};
use clock_core::{
    format_duration, ClockSnapshot, Countdown, CountdownPhase, DurationInput, Stopwatch,
    StopwatchPhase, TimerToggle,
};

#[test]
fn formatting_examples() {
    assert_eq!(format_duration(0, true), "00:00:00.000");
    assert_eq!(format_duration(3_661_000, false), "01:01:01");
    assert_eq!(format_duration(-50, true), "00:00:00.000");
}

#[test]
fn clock_hours() {
    let tz = FixedOffset::east_opt(0).unwrap();
    let midnight = ClockSnapshot::at(&tz.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
    assert_eq!(midnight.hands().hour, 0.0);
    assert_eq!(midnight.strings.ampm, "AM");
    assert_eq!(&midnight.strings.digital[..2], "12");

    let one_pm = ClockSnapshot::at(&tz.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap());
    assert_eq!(&one_pm.strings.digital[..2], "01");
    assert_eq!(one_pm.strings.ampm, "PM");
}

#[test]
fn stopwatch_lap_then_reset_after_pause() {
    let mut sw = Stopwatch::new();
    let t0 = 10_000;
    sw.toggle(t0);
    // Ticks every 30ms up to 1500ms
    let mut now = t0;
    while now < t0 + 1_500 {
        now += 30;
        sw.tick(now);
    }
    let lap = sw.lap(t0 + 1_500).unwrap();
    assert_eq!(lap.duration_ms, 1_500);
    assert_eq!(lap.cumulative_ms, 1_500);

    assert!(!sw.reset());
    sw.toggle(t0 + 1_600);
    assert!(sw.reset());
    assert_eq!(sw.elapsed_ms(), 0);
    assert!(sw.laps().is_empty());
}

#[test]
fn timer_runs_to_expiry() {
    let mut cd = Countdown::new();
    let input = DurationInput::new("0", "0", "5");
    assert_eq!(cd.toggle(0, &input), TimerToggle::Started { configured_ms: 5_000 });
    assert_eq!(cd.remaining_ms(), 5_000);

    let mut now = 0;
    while cd.is_running() {
        now += 100;
        cd.tick(now);
    }
    assert_eq!(now, 5_000);
    assert_eq!(cd.phase(), CountdownPhase::Expired);
    assert_eq!(cd.remaining_ms(), 0);
    assert_eq!(cd.display(), "00:00:00");
}

#[test]
fn reset_twice_is_idempotent() {
    let mut sw = Stopwatch::new();
    sw.reset();
    sw.reset();
    assert_eq!(sw.phase(), StopwatchPhase::Idle);
    assert_eq!(sw.elapsed_ms(), 0);

    let mut cd = Countdown::new();
    cd.reset();
    cd.reset();
    assert_eq!(cd.phase(), CountdownPhase::Unconfigured);
    assert_eq!(cd.remaining_ms(), 0);
}

#[test]
fn the_same_control_alternates() {
    let mut sw = Stopwatch::new();
    sw.toggle(0);
    sw.toggle(0);
    assert_eq!(sw.phase(), StopwatchPhase::Paused);
    sw.toggle(0);
    assert_eq!(sw.phase(), StopwatchPhase::Running);

    let input = DurationInput::new("0", "1", "0");
    let mut cd = Countdown::new();
    cd.toggle(0, &input);
    cd.toggle(0, &input);
    assert_eq!(cd.phase(), CountdownPhase::Paused);
    cd.toggle(0, &input);
    assert_eq!(cd.phase(), CountdownPhase::Running);
}
