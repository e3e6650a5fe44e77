//! Engine error types.  None of these are fatal: they are logged and
//! reported, and playback simply does not start or continues without a lock.

use thiserror::Error;

/// Why `start` declined to begin playback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StartRefused {
    #[error("nothing to scroll: no document is loaded")]
    NoContainer,

    #[error("nothing to scroll: content ({scroll_height:.0}px) fits in the viewport ({client_height:.0}px)")]
    Unscrollable {
        scroll_height: f64,
        client_height: f64,
    },
}

/// Wake-lock acquisition or release failure.
#[derive(Debug, Error)]
pub enum WakeLockError {
    #[error("wake lock disabled")]
    Disabled,

    #[error("no wake-lock provider on this platform")]
    Unsupported,

    #[error("wake-lock provider `{program}` could not be started")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("wake-lock provider `{program}` exited right away ({status})")]
    Exited {
        program: &'static str,
        status: std::process::ExitStatus,
    },

    #[error("failed to release wake lock")]
    Release(#[source] std::io::Error),
}
