//! Keep the display awake while the script is rolling.
//!
//! There is no portable API for this from a terminal, so the lock is an
//! inhibitor child process that lives exactly as long as the lock is held:
//! `systemd-inhibit` on Linux, `caffeinate` on macOS.

use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use crate::core::error::WakeLockError;
use crate::core::surface::WakeLock;

/// A running inhibitor.
#[derive(Debug)]
struct Inhibitor {
    program: &'static str,
    child: Child,
}

/// Process-backed wake lock.
#[derive(Debug)]
pub struct SystemWakeLock {
    enabled: bool,
    held: Option<Inhibitor>,
}

impl SystemWakeLock {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            held: None,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// Reap the inhibitor if it has died on its own (e.g. no session bus).
    /// Returns `true` when the lock was lost by this call.
    pub fn check_exited(&mut self) -> bool {
        let Some(inhibitor) = self.held.as_mut() else {
            return false;
        };
        match inhibitor.child.try_wait() {
            Ok(None) => false,
            Ok(Some(status)) => {
                warn!(program = inhibitor.program, %status, "wake-lock provider exited, display may sleep");
                self.held = None;
                true
            }
            Err(e) => {
                warn!(program = inhibitor.program, error = %e, "could not poll wake-lock provider");
                false
            }
        }
    }
}

/// Program and arguments that hold an idle/sleep inhibitor until killed.
#[cfg(target_os = "linux")]
fn inhibitor_command() -> Option<(&'static str, &'static [&'static str])> {
    const ARGS: &[&str] = &[
        "--what=idle:sleep",
        "--who=prompter",
        "--why=teleprompter playback",
        "sleep",
        "infinity",
    ];
    Some(("systemd-inhibit", ARGS))
}

#[cfg(target_os = "macos")]
fn inhibitor_command() -> Option<(&'static str, &'static [&'static str])> {
    const ARGS: &[&str] = &["-d", "-i"];
    Some(("caffeinate", ARGS))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn inhibitor_command() -> Option<(&'static str, &'static [&'static str])> {
    None
}

impl WakeLock for SystemWakeLock {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        if !self.enabled {
            return Err(WakeLockError::Disabled);
        }
        if self.held.is_some() {
            return Ok(());
        }
        let (program, args) = inhibitor_command().ok_or(WakeLockError::Unsupported)?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| WakeLockError::Spawn { program, source })?;
        if let Ok(Some(status)) = child.try_wait() {
            return Err(WakeLockError::Exited { program, status });
        }
        debug!(program, pid = child.id(), "wake lock acquired");
        self.held = Some(Inhibitor { program, child });
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        let Some(mut inhibitor) = self.held.take() else {
            return Ok(());
        };
        let killed = inhibitor.child.kill();
        // Reap it either way; the exit status of a killed inhibitor is
        // meaningless.
        let _ = inhibitor.child.wait();
        killed.map_err(WakeLockError::Release)?;
        debug!(program = inhibitor.program, "wake lock released");
        Ok(())
    }
}

impl Drop for SystemWakeLock {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
