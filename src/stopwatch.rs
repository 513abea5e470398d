use std::sync::mpsc::Sender;

use clock_core::{format_duration, Stopwatch, StopwatchToggle};

use crate::app::AppMsg;
use crate::pump::{Pump, PumpId};

pub const TICK_MS: u64 = 30;

/// Stopwatch controller: the core state machine, its tick schedule and the
/// lap list scroll position.
pub struct StopwatchPanel {
    pub stopwatch: Stopwatch,
    pub lap_scroll_offset: usize,
    pump: Pump,
}

impl StopwatchPanel {
    pub fn new(events: Sender<AppMsg>) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            lap_scroll_offset: 0,
            pump: Pump::spawn(PumpId::Stopwatch, TICK_MS, events),
        }
    }

    pub fn toggle(&mut self, now_ms: u64) {
        match self.stopwatch.toggle(now_ms) {
            StopwatchToggle::Started => {
                self.pump.start();
                log::info!("stopwatch running from {}", self.display());
            }
            StopwatchToggle::Paused => {
                self.pump.stop();
                log::info!("stopwatch paused at {}", self.display());
            }
        }
    }

    pub fn lap(&mut self, now_ms: u64) {
        if let Some(lap) = self.stopwatch.lap(now_ms) {
            // Keep the newest lap in view
            self.lap_scroll_offset = 0;
            log::debug!(
                "lap {}: {} (total {})",
                lap.index,
                format_duration(lap.duration_ms as i64, true),
                format_duration(lap.cumulative_ms as i64, true)
            );
        }
    }

    pub fn reset(&mut self) {
        if self.stopwatch.reset() {
            self.pump.stop();
            self.lap_scroll_offset = 0;
            log::info!("stopwatch reset");
        }
    }

    pub fn on_tick(&mut self, generation: u64, now_ms: u64) {
        if self.pump.accepts(generation) {
            self.stopwatch.tick(now_ms);
        }
    }

    pub fn scroll_up(&mut self) {
        self.lap_scroll_offset = self.lap_scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self.stopwatch.laps().len().saturating_sub(1);
        self.lap_scroll_offset = (self.lap_scroll_offset + 1).min(max);
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn display(&self) -> String {
        format_duration(self.stopwatch.elapsed_ms() as i64, true)
    }
}
