use std::path::PathBuf;

use clap::Parser;

/// Analog and digital clock, stopwatch with laps, and countdown timer.
#[derive(Debug, Default, Parser)]
#[command(name = "dyne-clock", version, about)]
pub struct Cli {
    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tab shown at startup: clock, stopwatch or timer
    #[arg(long, value_name = "TAB")]
    pub tab: Option<String>,

    /// Pre-fill the timer fields, as SS, MM:SS or HH:MM:SS
    #[arg(long, value_name = "DURATION")]
    pub timer: Option<String>,

    /// Number of background particles (0 disables them)
    #[arg(long, value_name = "N")]
    pub particles: Option<usize>,

    /// Don't ring the terminal bell when the timer finishes
    #[arg(long)]
    pub no_bell: bool,

    /// Don't send a desktop notification when the timer finishes
    #[arg(long)]
    pub no_notify: bool,

    /// off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
