//! Stop token and termination-signal wiring.
//!
//! The monitor loop polls a `StopToken` at the top of each iteration and
//! while sleeping. SIGINT, SIGTERM and SIGQUIT all set the same flag; the
//! handler does nothing else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use crate::error::{MonitorError, Result};

/// Longest single nap inside `StopToken::sleep`.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

pub const TERMINATION_SIGNALS: [libc::c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGQUIT];

/// Shared "please stop" flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Withdraw a stop request. Handlers stay installed.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, waking early once stopped.
    ///
    /// Returns true if the token is stopped when the sleep ends.
    /// A `duration` too large to add to the clock sleeps until stopped.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.is_stopped() {
                return true;
            }
            let nap = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    (deadline - now).min(SLEEP_SLICE)
                }
                None => SLEEP_SLICE,
            };
            std::thread::sleep(nap);
        }
    }
}

static SIGNAL_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

extern "C" fn on_termination_signal(_signum: libc::c_int) {
    if let Some(flag) = SIGNAL_FLAG.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

/// Route SIGINT, SIGTERM and SIGQUIT to `token`. Only one token per process
/// can receive signals; a second call fails.
pub fn install_handlers(token: &StopToken) -> Result<()> {
    if SIGNAL_FLAG.set(Arc::clone(&token.flag)).is_err() {
        return Err(MonitorError::Signal(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "signal handlers already installed",
        )));
    }
    let handler = on_termination_signal as extern "C" fn(libc::c_int);
    for signum in TERMINATION_SIGNALS {
        // SAFETY: the sigaction struct is fully initialised before use and the
        // handler only performs an atomic store.
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = handler as libc::sighandler_t;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signum, &action, std::ptr::null_mut())
        };
        if rc != 0 {
            return Err(MonitorError::Signal(std::io::Error::last_os_error()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_running() {
        let token = StopToken::new();
        assert!(!token.is_stopped());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = StopToken::new();
        let other = token.clone();
        other.stop();
        assert!(token.is_stopped());
    }

    #[test]
    fn reset_clears_the_flag_for_every_clone() {
        let token = StopToken::new();
        let other = token.clone();
        token.stop();
        other.reset();
        assert!(!token.is_stopped());
    }

    #[test]
    fn sleep_runs_full_duration_when_not_stopped() {
        let token = StopToken::new();
        let start = Instant::now();
        assert!(!token.sleep(Duration::from_millis(60)));
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn sleep_returns_immediately_when_stopped() {
        let token = StopToken::new();
        token.stop();
        let start = Instant::now();
        assert!(token.sleep(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn sleep_wakes_when_stopped_from_another_thread() {
        let token = StopToken::new();
        let remote = token.clone();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            remote.stop();
        });
        let start = Instant::now();
        assert!(token.sleep(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(2));
        stopper.join().unwrap();
    }

    #[test]
    fn unbounded_sleep_still_wakes_on_stop() {
        let token = StopToken::new();
        let remote = token.clone();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            remote.stop();
        });
        assert!(token.sleep(Duration::MAX));
        stopper.join().unwrap();
    }

    #[test]
    fn zero_sleep_does_not_block() {
        let token = StopToken::new();
        assert!(!token.sleep(Duration::ZERO));
    }
}
