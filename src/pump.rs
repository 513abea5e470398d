//! Recurring tick schedules. Each controller owns one pump: a thread that,
//! while started, sleeps for its interval and posts a tick to the event loop.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::app::AppMsg;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PumpId {
    Clock,
    Stopwatch,
    Countdown,
}

enum PumpOp {
    Start { interval_ms: u64, generation: u64 },
    Stop,
    Quit,
}

/// Control handle for a pump thread.
///
/// Every start and stop bumps the generation. Ticks carry the generation
/// they were produced under, and the owner drops any tick whose generation
/// is stale, so nothing already queued runs after a stop.
pub struct Pump {
    id: PumpId,
    interval_ms: u64,
    conn: Sender<PumpOp>,
    generation: u64,
    running: bool,
}

impl Pump {
    pub fn spawn(id: PumpId, interval_ms: u64, events: Sender<AppMsg>) -> Self {
        let (conn, ops) = mpsc::channel();
        thread::Builder::new()
            .name(format!("pump-{:?}", id).to_lowercase())
            .spawn(move || pump_thread(id, ops, events))
            .map_err(|e| log::error!("can't spawn {:?} pump: {}", id, e))
            .ok();
        Self {
            id,
            interval_ms,
            conn,
            generation: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.generation += 1;
        self.conn
            .send(PumpOp::Start {
                interval_ms: self.interval_ms,
                generation: self.generation,
            })
            .ok();
        log::trace!("{:?} pump started, generation {}", self.id, self.generation);
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.generation += 1;
        self.conn.send(PumpOp::Stop).ok();
        log::trace!("{:?} pump stopped", self.id);
    }

    /// Whether a tick stamped with `generation` should be processed.
    pub fn accepts(&self, generation: u64) -> bool {
        self.running && generation == self.generation
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.conn.send(PumpOp::Quit).ok();
    }
}

fn pump_thread(id: PumpId, ops: Receiver<PumpOp>, events: Sender<AppMsg>) {
    let mut interval = Duration::from_millis(100);
    let mut generation = 0;
    let mut running = false;

    loop {
        if running {
            thread::sleep(interval);
            if events.send(AppMsg::Pump(id, generation)).is_err() {
                // Event loop is gone
                break;
            }
        }

        // Non-blocking while running, block-wait while stopped
        let op = if running {
            match ops.try_recv() {
                Ok(op) => Some(op),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            match ops.recv() {
                Ok(op) => Some(op),
                Err(_) => break,
            }
        };

        match op {
            Some(PumpOp::Start {
                interval_ms,
                generation: g,
            }) => {
                interval = Duration::from_millis(interval_ms.max(1));
                generation = g;
                running = true;
            }
            Some(PumpOp::Stop) => running = false,
            Some(PumpOp::Quit) => break,
            None => {}
        }
    }
}
