use std::sync::mpsc::Sender;

use clock_core::{format_duration, Countdown, CountdownPhase, CountdownTick, DurationInput, TimerToggle};

use crate::alerts::{fire_alert, Notifier, Permission};
use crate::app::AppMsg;
use crate::pump::{Pump, PumpId};

pub const TICK_MS: u64 = 100;
/// How long the "done" flash stays up after expiry.
pub const DONE_FLASH_MS: u64 = 3_100;
const MAX_FIELD_LEN: usize = 3;

const ALERT_TITLE: &str = "⏰ Dyne Clock";
const ALERT_BODY: &str = "Timer finished!";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    pub fn next(self) -> Field {
        match self {
            Field::Hours => Field::Minutes,
            Field::Minutes | Field::Seconds => Field::Seconds,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Seconds => Field::Minutes,
            Field::Minutes | Field::Hours => Field::Hours,
        }
    }
}

/// Countdown controller: input fields, the core state machine, its tick
/// schedule, the done flash and the notification collaborator.
pub struct TimerPanel {
    pub countdown: Countdown,
    pub input: DurationInput,
    pub focus: Field,
    done_until_ms: Option<u64>,
    permission_requested: bool,
    notifier: Box<dyn Notifier>,
    pump: Pump,
}

impl TimerPanel {
    pub fn new(preset: DurationInput, notifier: Box<dyn Notifier>, events: Sender<AppMsg>) -> Self {
        Self {
            countdown: Countdown::new(),
            input: preset,
            focus: Field::Seconds,
            done_until_ms: None,
            permission_requested: false,
            notifier,
            pump: Pump::spawn(PumpId::Countdown, TICK_MS, events),
        }
    }

    pub fn toggle(&mut self, now_ms: u64) {
        match self.countdown.toggle(now_ms, &self.input) {
            TimerToggle::Started { configured_ms } => {
                self.done_until_ms = None;
                self.pump.start();
                self.request_permission_once();
                log::info!("timer started for {}", format_duration(configured_ms as i64, false));
            }
            TimerToggle::Resumed => {
                self.pump.start();
                self.request_permission_once();
                log::info!("timer resumed with {} left", self.countdown.display());
            }
            TimerToggle::Paused => {
                self.pump.stop();
                log::info!("timer paused with {} left", self.countdown.display());
            }
            TimerToggle::Expired => self.on_expired(now_ms),
            TimerToggle::Rejected => {
                log::debug!("timer start ignored, duration is not positive");
            }
        }
    }

    /// Back to the input fields. Allowed in any configured state.
    pub fn reset(&mut self) {
        if self.countdown.reset() {
            self.pump.stop();
            self.done_until_ms = None;
            log::info!("timer reset");
        }
    }

    pub fn on_tick(&mut self, generation: u64, now_ms: u64) {
        if !self.pump.accepts(generation) {
            return;
        }
        if self.countdown.tick(now_ms) == CountdownTick::Expired {
            self.on_expired(now_ms);
        }
    }

    fn on_expired(&mut self, now_ms: u64) {
        self.pump.stop();
        self.done_until_ms = Some(now_ms + DONE_FLASH_MS);
        log::info!("timer expired");
        fire_alert(self.notifier.as_mut(), ALERT_TITLE, ALERT_BODY);
    }

    fn request_permission_once(&mut self) {
        if self.permission_requested {
            return;
        }
        self.permission_requested = true;
        if self.notifier.permission() == Permission::Default {
            let permission = self.notifier.request_permission();
            log::debug!("notification permission: {:?}", permission);
        }
    }

    pub fn flash_active(&self, now_ms: u64) -> bool {
        self.done_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Drop the done flash once its interval has passed.
    pub fn clear_flash(&mut self, now_ms: u64) {
        if self.done_until_ms.is_some() && !self.flash_active(now_ms) {
            self.done_until_ms = None;
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.countdown.phase() == CountdownPhase::Unconfigured
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Hours => &mut self.input.hours,
            Field::Minutes => &mut self.input.minutes,
            Field::Seconds => &mut self.input.seconds,
        }
    }

    pub fn type_digit(&mut self, digit: char) {
        if !self.accepts_input() || !digit.is_ascii_digit() {
            return;
        }
        let field = self.field_mut();
        if field.len() < MAX_FIELD_LEN {
            field.push(digit);
        }
    }

    pub fn backspace(&mut self) {
        if self.accepts_input() {
            self.field_mut().pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn is_configured(&self) -> bool {
        self.countdown.phase() != CountdownPhase::Unconfigured
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::alerts::testing::RecordingNotifier;
    use crate::alerts::Alerts;

    fn panel(input: DurationInput, notifier: RecordingNotifier) -> TimerPanel {
        let (tx, _rx) = mpsc::channel();
        TimerPanel::new(input, Box::new(notifier), tx)
    }

    #[test]
    fn test_expiry_notifies_and_flashes() {
        let notifier = RecordingNotifier::granting(Permission::Granted);
        let sent = notifier.sent.clone();
        let mut timer = panel(DurationInput::new("0", "0", "5"), notifier);

        timer.toggle(0);
        assert_eq!(timer.countdown.remaining_ms(), 5_000);
        for generation_tick in 1..=50u64 {
            timer.on_tick(1, generation_tick * 100);
        }
        assert_eq!(timer.countdown.phase(), CountdownPhase::Expired);
        assert_eq!(timer.countdown.display(), "00:00:00");
        assert_eq!(
            *sent.lock().unwrap(),
            vec![(ALERT_TITLE.to_string(), ALERT_BODY.to_string())]
        );

        assert!(timer.flash_active(5_000));
        assert!(timer.flash_active(8_099));
        timer.clear_flash(8_099);
        assert!(timer.flash_active(8_099));
        timer.clear_flash(8_100);
        assert!(!timer.flash_active(8_100));
    }

    #[test]
    fn test_expiry_reaches_every_channel_with_bell_pre_granted() {
        let mut bell = RecordingNotifier::granting(Permission::Granted);
        bell.permission = Permission::Granted;
        let desktop = RecordingNotifier::granting(Permission::Granted);
        let bell_sent = bell.sent.clone();
        let desktop_sent = desktop.sent.clone();
        let desktop_requests = desktop.requests.clone();

        let alerts = Alerts::with_sinks(vec![Box::new(bell), Box::new(desktop)]);
        let (tx, _rx) = mpsc::channel();
        let mut timer = TimerPanel::new(DurationInput::new("", "", "1"), Box::new(alerts), tx);

        timer.toggle(0);
        assert_eq!(*desktop_requests.lock().unwrap(), 1);
        timer.on_tick(1, 1_000);
        assert_eq!(timer.countdown.phase(), CountdownPhase::Expired);

        assert_eq!(*desktop_requests.lock().unwrap(), 1);
        assert_eq!(desktop_sent.lock().unwrap().len(), 1);
        assert_eq!(bell_sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_denied_permission_never_blocks() {
        let notifier = RecordingNotifier::granting(Permission::Denied);
        let sent = notifier.sent.clone();
        let mut timer = panel(DurationInput::new("", "", "1"), notifier);
        timer.toggle(0);
        timer.on_tick(1, 1_000);
        assert_eq!(timer.countdown.phase(), CountdownPhase::Expired);
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_permission_requested_once() {
        let notifier = RecordingNotifier::granting(Permission::Denied);
        let requests = notifier.requests.clone();
        let mut timer = panel(DurationInput::new("", "1", "0"), notifier);
        timer.toggle(0);
        timer.toggle(100);
        timer.toggle(200);
        timer.reset();
        timer.toggle(300);
        assert_eq!(*requests.lock().unwrap(), 1);
    }

    #[test]
    fn test_rejected_start_changes_nothing() {
        let notifier = RecordingNotifier::granting(Permission::Granted);
        let requests = notifier.requests.clone();
        let mut timer = panel(DurationInput::default(), notifier);
        timer.toggle(0);
        assert!(timer.accepts_input());
        assert!(!timer.is_running());
        assert_eq!(*requests.lock().unwrap(), 0);
    }

    #[test]
    fn test_stale_tick_after_pause() {
        let mut timer = panel(
            DurationInput::new("", "", "2"),
            RecordingNotifier::granting(Permission::Granted),
        );
        timer.toggle(0);
        timer.toggle(500);
        timer.on_tick(1, 5_000);
        assert_eq!(timer.countdown.remaining_ms(), 1_500);
        assert_eq!(timer.countdown.phase(), CountdownPhase::Paused);
    }

    #[test]
    fn test_field_editing() {
        let mut timer = panel(
            DurationInput::default(),
            RecordingNotifier::granting(Permission::Granted),
        );
        timer.focus_prev();
        for c in ['1', 'x', '2', '3', '4'] {
            timer.type_digit(c);
        }
        assert_eq!(timer.input.minutes, "123");
        timer.backspace();
        timer.focus_prev();
        timer.type_digit('1');
        assert_eq!(timer.input, DurationInput::new("1", "12", ""));

        // Fields are locked while a countdown is on screen
        timer.toggle(0);
        timer.type_digit('9');
        timer.backspace();
        assert_eq!(timer.input, DurationInput::new("1", "12", ""));

        // Reset restores the fields as they were
        timer.reset();
        assert!(timer.accepts_input());
        assert_eq!(timer.input.total_ms(), (3600 + 12 * 60) * 1000);
    }
}
