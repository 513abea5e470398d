use std::sync::mpsc::Sender;
use std::time::Instant;

use clock_core::{Tab, TabSelector};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::alerts::{Alerts, Notifier};
use crate::clock::{ClockPanel, REFRESH_MS};
use crate::config::Config;
use crate::countdown::TimerPanel;
use crate::particles::ParticleField;
use crate::pump::PumpId;
use crate::stopwatch::StopwatchPanel;

/// Everything the event loop reacts to, in arrival order.
pub enum AppMsg {
    Key(KeyEvent),
    Resize,
    /// A tick from the named pump, stamped with its generation.
    Pump(PumpId, u64),
    /// The input reader hit an unrecoverable error.
    InputClosed,
}

pub struct App {
    started: Instant,
    pub tabs: TabSelector,
    pub clock: ClockPanel,
    pub stopwatch: StopwatchPanel,
    pub timer: TimerPanel,
    pub particles: ParticleField,
    pub help_visible: bool,
    pub confirm_exit: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, events: Sender<AppMsg>) -> Self {
        let notifier: Box<dyn Notifier> = Box::new(Alerts::from_config(&config.alerts));
        Self::with_notifier(config, notifier, events)
    }

    pub fn with_notifier(config: &Config, notifier: Box<dyn Notifier>, events: Sender<AppMsg>) -> Self {
        Self {
            started: Instant::now(),
            tabs: TabSelector::new(config.start_tab),
            clock: ClockPanel::new(events.clone()),
            stopwatch: StopwatchPanel::new(events.clone()),
            timer: TimerPanel::new(config.timer_preset.clone(), notifier, events),
            particles: ParticleField::new(config.particles),
            help_visible: false,
            confirm_exit: false,
            should_quit: false,
        }
    }

    /// Milliseconds on the monotonic clock since startup.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle one message. Returns whether the screen needs redrawing.
    pub fn handle(&mut self, msg: AppMsg) -> bool {
        let now = self.now_ms();
        match msg {
            AppMsg::Key(key) => {
                self.handle_key(key, now);
                true
            }
            AppMsg::Resize => true,
            AppMsg::Pump(id, generation) => self.handle_pump(id, generation, now),
            AppMsg::InputClosed => {
                log::error!("terminal input closed, exiting");
                self.should_quit = true;
                false
            }
        }
    }

    pub fn handle_pump(&mut self, id: PumpId, generation: u64, now_ms: u64) -> bool {
        match id {
            PumpId::Clock => {
                if !self.clock.on_tick(generation) {
                    return false;
                }
                self.particles.step(REFRESH_MS);
                self.timer.clear_flash(now_ms);
            }
            PumpId::Stopwatch => self.stopwatch.on_tick(generation, now_ms),
            PumpId::Countdown => self.timer.on_tick(generation, now_ms),
        }
        true
    }

    fn any_timer_running(&self) -> bool {
        self.stopwatch.is_running() || self.timer.is_running()
    }

    pub fn switch_tab(&mut self, name: &str) {
        if self.tabs.switch_tab(name) {
            log::debug!("switched to {} tab", name);
        } else {
            log::debug!("ignoring unknown tab '{}'", name);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now_ms: u64) {
        // Only handle key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // If help screen is showing, any key dismisses it
        if self.help_visible {
            self.help_visible = false;
            return;
        }

        if self.confirm_exit {
            match key.code {
                KeyCode::Char('y') => {
                    self.confirm_exit = false;
                    self.should_quit = true;
                }
                KeyCode::Char('n') | KeyCode::Esc => self.confirm_exit = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('?') => self.help_visible = true,
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.any_timer_running() {
                    self.confirm_exit = true;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => self.tabs.select(self.tabs.active().next()),
            KeyCode::BackTab => self.tabs.select(self.tabs.active().prev()),
            KeyCode::Char('c') => self.switch_tab("clock"),
            KeyCode::Char('s') => self.switch_tab("stopwatch"),
            KeyCode::Char('t') => self.switch_tab("timer"),
            // Digits belong to the timer fields while they are on screen
            KeyCode::Char('1') if !self.editing_timer() => self.switch_tab("clock"),
            KeyCode::Char('2') if !self.editing_timer() => self.switch_tab("stopwatch"),
            KeyCode::Char('3') if !self.editing_timer() => self.switch_tab("timer"),
            _ => match self.tabs.active() {
                Tab::Clock => {}
                Tab::Stopwatch => self.handle_key_stopwatch(key.code, now_ms),
                Tab::Timer => self.handle_key_timer(key.code, now_ms),
            },
        }
    }

    fn editing_timer(&self) -> bool {
        self.tabs.is_active(Tab::Timer) && self.timer.accepts_input()
    }

    fn handle_key_stopwatch(&mut self, code: KeyCode, now_ms: u64) {
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => self.stopwatch.toggle(now_ms),
            KeyCode::Char('l') => {
                if self.stopwatch.is_running() {
                    self.stopwatch.lap(now_ms);
                }
            }
            KeyCode::Char('r') => {
                if !self.stopwatch.is_running() {
                    self.stopwatch.reset();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.stopwatch.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.stopwatch.scroll_down(),
            _ => {}
        }
    }

    fn handle_key_timer(&mut self, code: KeyCode, now_ms: u64) {
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => self.timer.toggle(now_ms),
            KeyCode::Char('r') => {
                if self.timer.is_configured() {
                    self.timer.reset();
                }
            }
            KeyCode::Left => self.timer.focus_prev(),
            KeyCode::Right => self.timer.focus_next(),
            KeyCode::Backspace => self.timer.backspace(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.timer.type_digit(c),
            _ => {}
        }
    }

    pub fn help_text(&self) -> &'static str {
        match self.tabs.active() {
            Tab::Clock => {
                "CLOCK HELP\n\n\
                 1/c    Clock\n\
                 2/s    Stopwatch\n\
                 3/t    Timer\n\
                 Tab    Next tab\n\
                 ?      Help\n\
                 q      Quit"
            }
            Tab::Stopwatch => {
                "STOPWATCH HELP\n\n\
                 Space  Start/Pause\n\
                 l      Record lap (running)\n\
                 r      Reset (paused)\n\
                 Up/Dn  Scroll laps (also k/j)\n\
                 Tab    Next tab\n\
                 q      Quit"
            }
            Tab::Timer => {
                "TIMER HELP\n\n\
                 0-9    Edit field\n\
                 Lt/Rt  Move between fields\n\
                 Space  Start/Pause\n\
                 r      Reset\n\
                 Tab    Next tab\n\
                 q      Quit"
            }
        }
    }
}
