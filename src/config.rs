//! Startup settings: built-in defaults, then the TOML config file, then
//! command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clock_core::{DurationInput, Tab, UnknownTab};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use crate::alerts::AlertConfig;
use crate::cli::Cli;

const APP_DIR: &str = "dyne-clock";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "dyne-clock.log";
pub const DEFAULT_PARTICLES: usize = 40;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid timer preset '{0}' (expected SS, MM:SS or HH:MM:SS)")]
    InvalidPreset(String),
    #[error(transparent)]
    InvalidTab(#[from] UnknownTab),
    #[error("invalid log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub start_tab: Option<String>,
    pub particles: Option<usize>,
    pub alerts: AlertsSection,
    pub timer: TimerSection,
    pub log: LogSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertsSection {
    pub bell: Option<bool>,
    pub notification: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimerSection {
    pub preset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// The config file that was actually read, if any.
    pub path: Option<PathBuf>,
    pub start_tab: Tab,
    pub particles: usize,
    pub alerts: AlertConfig,
    pub timer_preset: DurationInput,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let (file, path) = match &cli.config {
            Some(path) => (Some(read_file(path)?), Some(path.clone())),
            None => match default_config_path() {
                Some(path) if path.exists() => (Some(read_file(&path)?), Some(path)),
                _ => (None, None),
            },
        };
        let mut config = Self::resolve(file.unwrap_or_default(), cli)?;
        config.path = path;
        Ok(config)
    }

    /// Merge a parsed file with command-line flags; flags win.
    pub fn resolve(file: FileConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let start_tab = match cli.tab.as_deref().or(file.start_tab.as_deref()) {
            Some(name) => name.parse()?,
            None => Tab::default(),
        };

        let timer_preset = match cli.timer.as_deref().or(file.timer.preset.as_deref()) {
            Some(preset) => DurationInput::from_preset(preset)
                .ok_or_else(|| ConfigError::InvalidPreset(preset.to_string()))?,
            None => DurationInput::default(),
        };

        let log_level = match cli.log_level.as_deref().or(file.log.level.as_deref()) {
            Some(level) => LevelFilter::from_str(level)
                .map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            path: None,
            start_tab,
            particles: cli.particles.or(file.particles).unwrap_or(DEFAULT_PARTICLES),
            alerts: AlertConfig {
                bell: !cli.no_bell && file.alerts.bell.unwrap_or(true),
                notification: !cli.no_notify && file.alerts.notification.unwrap_or(true),
            },
            timer_preset,
            log_level,
            log_file: cli
                .log_file
                .clone()
                .or(file.log.file)
                .unwrap_or_else(default_log_path),
        })
    }
}

pub fn parse(text: &str, path: &Path) -> Result<FileConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join(LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(text: &str) -> FileConfig {
        parse(text, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(FileConfig::default(), &Cli::default()).unwrap();
        assert_eq!(config.start_tab, Tab::Clock);
        assert_eq!(config.particles, DEFAULT_PARTICLES);
        assert_eq!(config.alerts, AlertConfig::default());
        assert_eq!(config.timer_preset, DurationInput::default());
        assert_eq!(config.log_level, LevelFilter::Info);
        assert!(config.log_file.ends_with("dyne-clock/dyne-clock.log"));
    }

    #[test]
    fn test_file_values() {
        let parsed = file(
            r#"
            start_tab = "timer"
            particles = 0

            [alerts]
            bell = false

            [timer]
            preset = "25:00"

            [log]
            level = "debug"
            file = "/tmp/clock.log"
            "#,
        );
        let config = Config::resolve(parsed, &Cli::default()).unwrap();
        assert_eq!(config.start_tab, Tab::Timer);
        assert_eq!(config.particles, 0);
        assert!(!config.alerts.bell);
        assert!(config.alerts.notification);
        assert_eq!(config.timer_preset, DurationInput::new("", "25", "00"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, PathBuf::from("/tmp/clock.log"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let parsed = file("start_tab = \"timer\"\nparticles = 10\n[log]\nlevel = \"warn\"\n");
        let cli = Cli {
            tab: Some("stopwatch".into()),
            particles: Some(3),
            no_notify: true,
            log_level: Some("trace".into()),
            timer: Some("90".into()),
            ..Cli::default()
        };
        let config = Config::resolve(parsed, &cli).unwrap();
        assert_eq!(config.start_tab, Tab::Stopwatch);
        assert_eq!(config.particles, 3);
        assert!(config.alerts.bell);
        assert!(!config.alerts.notification);
        assert_eq!(config.log_level, LevelFilter::Trace);
        assert_eq!(config.timer_preset.total_ms(), 90_000);
    }

    #[test]
    fn test_invalid_values() {
        let bad_tab = Cli {
            tab: Some("alarm".into()),
            ..Cli::default()
        };
        assert!(matches!(
            Config::resolve(FileConfig::default(), &bad_tab),
            Err(ConfigError::InvalidTab(_))
        ));

        let bad_preset = file("[timer]\npreset = \"five minutes\"\n");
        assert!(matches!(
            Config::resolve(bad_preset, &Cli::default()),
            Err(ConfigError::InvalidPreset(_))
        ));

        let bad_level = file("[log]\nlevel = \"loud\"\n");
        assert!(matches!(
            Config::resolve(bad_level, &Cli::default()),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse("colour = \"red\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "start_tab = \"stopwatch\"\n").unwrap();

        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.start_tab, Tab::Stopwatch);
        assert_eq!(config.path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("nope.toml")),
            ..Cli::default()
        };
        assert!(matches!(Config::load(&cli), Err(ConfigError::Read { .. })));
    }
}
