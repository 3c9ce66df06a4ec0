//! Cooperative shutdown flag.
//!
//! The control loop reads the flag once per iteration; Ctrl-C (or closing
//! the strip window) clears it.  A few extra iterations after the clear are
//! harmless, so there is no handshake beyond the atomic store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    /// A flag in the running state.
    pub fn new() -> Self {
        RunFlag(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Request shutdown.  Idempotent.
    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Clear this flag on SIGINT / Ctrl-C.
    ///
    /// Only one handler can be installed per process.
    pub fn install_interrupt_handler(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            tracing::info!("interrupt received, stopping");
            flag.stop();
        })
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running_and_stops_once_for_all_clones() {
        let flag = RunFlag::new();
        let other = flag.clone();
        assert!(flag.is_running());
        other.stop();
        assert!(!flag.is_running());
        other.stop();
        assert!(!flag.is_running());
    }

    #[test]
    fn stop_is_visible_across_threads() {
        let flag = RunFlag::new();
        let remote = flag.clone();
        std::thread::spawn(move || remote.stop()).join().unwrap();
        assert!(!flag.is_running());
    }
}
