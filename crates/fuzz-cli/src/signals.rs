//! Stop requests from SIGINT and SIGTERM.
//!
//! The handlers only store into atomics, which keeps them async-signal-safe.
//! The campaign polls [`StopSignal::requested`] between iterations, so an
//! interrupted run still finishes its current invocation and prints a report.
//! Targets run in their own process group and never see the operator's Ctrl-C.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use tracing::debug;

static STOP_FLAG: AtomicBool = AtomicBool::new(false);
static LAST_SIGNAL: AtomicI32 = AtomicI32::new(0);

/// Signals that request a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// SIGINT - Interrupt (Ctrl+C).
    Interrupt,
    /// SIGTERM - Termination request.
    Terminate,
}

impl SignalKind {
    fn from_raw(signo: i32) -> Option<Self> {
        match signo {
            libc::SIGINT => Some(Self::Interrupt),
            libc::SIGTERM => Some(Self::Terminate),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Interrupt => write!(f, "SIGINT"),
            SignalKind::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Handle onto the process-wide stop flag.
#[derive(Debug, Clone, Copy)]
pub struct StopSignal {
    _registered: (),
}

impl StopSignal {
    /// Register SIGINT and SIGTERM handlers.
    ///
    /// On non-Unix platforms nothing is registered and the flag stays clear.
    pub fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        register_unix_handlers()?;

        Ok(Self { _registered: () })
    }

    /// Check if a stop has been requested.
    #[inline]
    pub fn requested(&self) -> bool {
        STOP_FLAG.load(Ordering::Relaxed)
    }

    /// The signal that requested the stop, if any.
    pub fn received(&self) -> Option<SignalKind> {
        SignalKind::from_raw(LAST_SIGNAL.load(Ordering::Relaxed))
    }
}

#[cfg(unix)]
fn register_unix_handlers() -> std::io::Result<()> {
    use std::os::raw::c_int;

    extern "C" fn on_stop_signal(signo: c_int) {
        LAST_SIGNAL.store(signo, Ordering::Relaxed);
        STOP_FLAG.store(true, Ordering::Relaxed);
    }

    for signo in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: the handler only performs atomic stores.
        let previous = unsafe { libc::signal(signo, on_stop_signal as libc::sighandler_t) };
        if previous == libc::SIG_ERR {
            return Err(std::io::Error::last_os_error());
        }
    }

    debug!("SIGINT/SIGTERM handlers registered");
    Ok(())
}
