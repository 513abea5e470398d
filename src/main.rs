mod alerts;
mod app;
mod cli;
mod clock;
mod config;
mod countdown;
mod logging;
mod particles;
mod pump;
mod stopwatch;
mod ui;

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{App, AppMsg};
use crate::cli::Cli;
use crate::config::Config;

pub const APP_NAME: &str = "Dyne Clock";

/// Owns the terminal for the lifetime of the UI and restores it on drop,
/// including when unwinding from a panic.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            disable_raw_mode().ok();
            return Err(e).context("failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
        self.terminal.show_cursor().ok();
    }
}

fn input_thread(events: Sender<AppMsg>) {
    loop {
        let msg = match event::read() {
            Ok(Event::Key(key)) => AppMsg::Key(key),
            Ok(Event::Resize(_, _)) => AppMsg::Resize,
            Ok(_) => continue,
            Err(e) => {
                log::error!("can't read terminal input: {}", e);
                events.send(AppMsg::InputClosed).ok();
                break;
            }
        };
        if events.send(msg).is_err() {
            break;
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;

    let (events, inbox) = mpsc::channel();
    let input_events = events.clone();
    thread::Builder::new()
        .name("input".into())
        .spawn(move || input_thread(input_events))
        .context("can't spawn input thread")?;

    let mut app = App::new(config, events);
    guard.terminal.draw(|f| ui::draw(f, &app))?;

    while !app.should_quit() {
        let msg = inbox.recv().context("event channel closed")?;
        if app.handle(msg) {
            guard.terminal.draw(|f| ui::draw(f, &app))?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli).context("failed to load configuration")?;
    logging::init(config.log_level, &config.log_file)?;

    log::info!("{} {} starting", APP_NAME, env!("CARGO_PKG_VERSION"));
    match &config.path {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("no config file, using defaults"),
    }

    let result = run(&config);
    match &result {
        Ok(()) => log::info!("{} exiting", APP_NAME),
        Err(e) => log::error!("{} exiting on error: {:#}", APP_NAME, e),
    }
    result
}
