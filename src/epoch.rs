//! # EpochState & EpochController — Shared Epoch Data and the Batch Loop (C7)
//!
//! An epoch is one batch: a span of `tile_len * batch_tiles` candidate start
//! positions, scanned by every worker in parallel. [`EpochState`] holds the
//! only two values workers and the controller share: `best_m` (smallest hit
//! confirmed this epoch) and `end_limit` (current inclusive upper bound,
//! shrunk as hits come in). [`EpochController`] drives the outer loop: run
//! one epoch, and if nothing was found, slide the window forward and run
//! another.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::error::SieveError;
use crate::fastmod::Reciprocal;

/// Immutable per-epoch parameters, shared read-only by every worker.
#[derive(Clone, Copy, Debug)]
pub struct EpochHeader {
    pub k: u32,
    pub tile_len: u64,
    pub step: u64,
    pub start_m: u64,
    pub end_m: u64,
}

/// The two cross-thread atomics of one epoch. `best_m == u64::MAX` means "no
/// hit yet" (the data model's "initial ∞").
///
/// Invariant E1: `end_limit <= best_m - 1` whenever `best_m` is finite. Both
/// fields are updated by [`try_set_best`](EpochState::try_set_best) so no
/// worker ever observes one without the other having caught up.
pub struct EpochState {
    best_m: AtomicU64,
    end_limit: AtomicU64,
}

impl EpochState {
    pub fn new(end_m: u64) -> Self {
        EpochState {
            best_m: AtomicU64::new(u64::MAX),
            end_limit: AtomicU64::new(end_m),
        }
    }

    pub fn end_limit(&self) -> u64 {
        self.end_limit.load(Ordering::Relaxed)
    }

    /// `None` if no hit has been confirmed yet this epoch.
    pub fn best_m(&self) -> Option<u64> {
        match self.best_m.load(Ordering::Acquire) {
            u64::MAX => None,
            v => Some(v),
        }
    }

    /// CAS-min `best_m` to `m`, then CAS-min `end_limit` to `m - 1` (saturating
    /// at 0). Both loops are monotone; a worker that loses the race simply
    /// discards its candidate.
    pub fn try_set_best(&self, m: u64) {
        let mut cur = self.best_m.load(Ordering::Relaxed);
        while m < cur {
            match self
                .best_m
                .compare_exchange_weak(cur, m, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(actual) => cur = actual,
            }
        }

        let new_limit = m.saturating_sub(1);
        let mut lim = self.end_limit.load(Ordering::Relaxed);
        while new_limit < lim {
            match self.end_limit.compare_exchange_weak(
                lim,
                new_limit,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => lim = actual,
            }
        }
    }
}

/// Drives the batch loop: one epoch covers
/// `tile_len * batch_tiles` candidates; if nothing is found, the window
/// slides forward by the same span and another epoch runs.
pub struct EpochController {
    pub tile_len: u64,
    pub batch_tiles: u64,
    pub thread_count: usize,
}

impl EpochController {
    /// Find the smallest m >= `start_m` such that m+1..m+k are all k-smooth,
    /// by running successive batches through `dispatcher`.
    pub fn find_m(
        &self,
        k: u32,
        start_m: u64,
        dispatcher: &Dispatcher,
        primes: &Arc<[u32]>,
        fd: &Arc<[Reciprocal]>,
        sm: &Arc<[u64]>,
    ) -> Result<u64, SieveError> {
        let span = self.tile_len * self.batch_tiles;
        let mut cur = start_m;
        loop {
            let end_m = cur.saturating_add(span - 1);
            let header = EpochHeader {
                k,
                tile_len: self.tile_len,
                step: self.tile_len * self.thread_count as u64,
                start_m: cur,
                end_m,
            };
            let state = Arc::new(EpochState::new(end_m));

            dispatcher.run_epoch(header, Arc::clone(&state), Arc::clone(primes), Arc::clone(fd), Arc::clone(sm))?;

            if let Some(m) = state.best_m() {
                return Ok(m);
            }

            if cur == u64::MAX {
                return Err(SieveError::CursorOverflow { k });
            }
            cur = cur.saturating_add(span);
        }
    }
}
