//! Best-effort alert delivery for the countdown timer. Nothing here is
//! allowed to fail the caller: every error ends up as a log line.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::APP_NAME;

const NOTIFY_SEND: &str = "notify-send";
const NOTIFY_EXPIRE_MS: &str = "5000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertConfig {
    pub bell: bool,
    pub notification: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            bell: true,
            notification: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Permission {
    /// Never asked.
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission not granted")]
    NotPermitted,
    #[error("failed to launch notify-send: {0}")]
    Spawn(#[source] io::Error),
    #[error("failed to ring terminal bell: {0}")]
    Bell(#[source] io::Error),
}

/// A platform capability that can show a short-lived notification.
pub trait Notifier: Send {
    fn permission(&self) -> Permission;
    fn request_permission(&mut self) -> Permission;
    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop notifications through `notify-send`. Permission is granted when
/// the executable is found on `PATH`.
pub struct DesktopNotifier {
    permission: Permission,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            permission: Permission::Default,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        self.permission = if on_path(NOTIFY_SEND) {
            Permission::Granted
        } else {
            log::info!("{} not found on PATH, desktop notifications disabled", NOTIFY_SEND);
            Permission::Denied
        };
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        if self.permission != Permission::Granted {
            return Err(NotifyError::NotPermitted);
        }
        let mut child = Command::new(NOTIFY_SEND)
            .args(["--app-name", APP_NAME, "--expire-time", NOTIFY_EXPIRE_MS, title, body])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(NotifyError::Spawn)?;
        // Reap in the background so the event loop never waits on it
        std::thread::spawn(move || child.wait());
        Ok(())
    }
}

fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| is_file(&dir.join(program))))
        .unwrap_or(false)
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

/// Rings the terminal bell. Always permitted.
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn notify(&mut self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        let mut out = io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(NotifyError::Bell)
    }
}

/// Every alert channel the config enables, behind one permission.
pub struct Alerts {
    sinks: Vec<Box<dyn Notifier>>,
}

impl Alerts {
    pub fn from_config(config: &AlertConfig) -> Self {
        let mut sinks: Vec<Box<dyn Notifier>> = Vec::new();
        if config.bell {
            sinks.push(Box::new(BellNotifier));
        }
        if config.notification {
            sinks.push(Box::new(DesktopNotifier::new()));
        }
        Self::with_sinks(sinks)
    }

    pub fn with_sinks(sinks: Vec<Box<dyn Notifier>>) -> Self {
        Self { sinks }
    }
}

impl Notifier for Alerts {
    fn permission(&self) -> Permission {
        // A channel that was never asked keeps the whole set unasked, so the
        // first start still requests it even when the bell is already granted.
        let perms: Vec<Permission> = self.sinks.iter().map(|s| s.permission()).collect();
        if perms.is_empty() || perms.contains(&Permission::Default) {
            Permission::Default
        } else if perms.contains(&Permission::Granted) {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn request_permission(&mut self) -> Permission {
        for sink in self.sinks.iter_mut() {
            if sink.permission() == Permission::Default {
                sink.request_permission();
            }
        }
        self.permission()
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        for sink in self.sinks.iter_mut() {
            if sink.permission() != Permission::Granted {
                continue;
            }
            if let Err(e) = sink.notify(title, body) {
                log::warn!("alert delivery failed: {}", e);
            }
        }
        Ok(())
    }
}

/// Deliver `body` if the notifier has permission; failures are logged and
/// dropped.
pub fn fire_alert(notifier: &mut dyn Notifier, title: &str, body: &str) {
    if notifier.permission() != Permission::Granted {
        log::debug!("alert skipped, permission {:?}", notifier.permission());
        return;
    }
    if let Err(e) = notifier.notify(title, body) {
        log::warn!("alert delivery failed: {}", e);
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records notifications instead of delivering them.
    pub struct RecordingNotifier {
        pub permission: Permission,
        pub grant: Permission,
        pub requests: Arc<Mutex<u32>>,
        pub sent: Arc<Mutex<Vec<(String, String)>>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn granting(grant: Permission) -> Self {
            Self {
                permission: Permission::Default,
                grant,
                requests: Arc::default(),
                sent: Arc::default(),
                fail: false,
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> Permission {
            self.permission
        }

        fn request_permission(&mut self) -> Permission {
            *self.requests.lock().unwrap() += 1;
            self.permission = self.grant;
            self.permission
        }

        fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Spawn(io::Error::new(io::ErrorKind::NotFound, "gone")));
            }
            self.sent.lock().unwrap().push((title.to_string(), body.to_string()));
            Ok(())
        }
    }
}
