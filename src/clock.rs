use std::sync::mpsc::Sender;

use chrono::Local;
use clock_core::ClockSnapshot;

use crate::app::AppMsg;
use crate::pump::{Pump, PumpId};

/// 20 refreshes a second keeps the second hand sweeping smoothly.
pub const REFRESH_MS: u64 = 50;

/// Clock display updater. Runs from startup until the app exits.
pub struct ClockPanel {
    pub snapshot: ClockSnapshot,
    pump: Pump,
}

impl ClockPanel {
    pub fn new(events: Sender<AppMsg>) -> Self {
        let mut pump = Pump::spawn(PumpId::Clock, REFRESH_MS, events);
        pump.start();
        Self {
            snapshot: ClockSnapshot::at(&Local::now()),
            pump,
        }
    }

    /// Returns false for a stale tick, which is dropped.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        if !self.pump.accepts(generation) {
            return false;
        }
        self.refresh();
        true
    }

    pub fn refresh(&mut self) {
        self.snapshot = ClockSnapshot::at(&Local::now());
    }
}
