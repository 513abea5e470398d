use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::Context;
use log::LevelFilter;

/// Route the `log` facade to `path`. The terminal belongs to the UI, so
/// nothing is ever written to stdout or stderr. `RUST_LOG` overrides `level`.
pub fn init(level: LevelFilter, path: &Path) -> anyhow::Result<()> {
    if level == LevelFilter::Off && std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}
