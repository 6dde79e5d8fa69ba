//! # Progress — Background Search Progress Reporter
//!
//! Tracks how far the k = 1..K loop has gotten and emits a periodic status
//! event. Touched only by the controller thread between epochs — workers
//! stay lock-free and log-free for the duration of an epoch, so this never
//! contends with the hot path.
//!
//! ## Background Reporter
//!
//! A dedicated thread logs progress every 2 seconds: the highest k completed
//! and its m(k). Shuts down cleanly via the `shutdown` atomic flag.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub struct Progress {
    k_done: AtomicU32,
    last_m: AtomicU64,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            k_done: AtomicU32::new(0),
            last_m: AtomicU64::new(0),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn start_reporter(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(Duration::from_secs(2));
            if progress.shutdown.load(Ordering::Relaxed) {
                break;
            }
            progress.print_status();
        })
    }

    pub fn record(&self, k: u32, m: u64) {
        self.k_done.store(k, Ordering::Relaxed);
        self.last_m.store(m, Ordering::Relaxed);
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let k_done = self.k_done.load(Ordering::Relaxed);
        let last_m = self.last_m.load(Ordering::Relaxed);
        tracing::info!(
            elapsed_secs = elapsed.as_secs(),
            k_done,
            last_m,
            "search progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let p = Progress::new();
        assert_eq!(p.k_done.load(Ordering::Relaxed), 0);
        assert_eq!(p.last_m.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn record_updates_values() {
        let p = Progress::new();
        p.record(7, 14);
        assert_eq!(p.k_done.load(Ordering::Relaxed), 7);
        assert_eq!(p.last_m.load(Ordering::Relaxed), 14);
    }

    #[test]
    fn stop_sets_shutdown_flag() {
        let p = Progress::new();
        assert!(!p.shutdown.load(Ordering::Relaxed));
        p.stop();
        assert!(p.shutdown.load(Ordering::Relaxed));
    }

    #[test]
    fn print_status_does_not_panic() {
        let p = Progress::new();
        p.record(3, 8);
        p.print_status();
    }
}
