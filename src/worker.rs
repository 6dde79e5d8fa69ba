//! # Worker — Per-Thread Epoch Loop (C6)
//!
//! Each worker owns its scratch buffers (`off`, `residual`, `bad_bits`)
//! exclusively and for its entire lifetime — they are sized lazily, grown
//! monotonically, and reused across tiles and across every value of k (see
//! the scratch-buffer lifecycle documented in `DESIGN.md`). A worker walks a
//! private arithmetic progression of tile bases: `start_m + tid*tile_len`,
//! `+ step`, `+ step`, … The only cross-thread communication inside an epoch
//! is the CAS-min update to [`EpochState`] in
//! [`EpochState::try_set_best`](crate::epoch::EpochState::try_set_best).

use crate::epoch::{EpochHeader, EpochState};
use crate::error::SieveError;
use crate::fastmod::{fastmod, Reciprocal};
use crate::tile_sieve::sieve_tile;
use crate::window_scan::first_smooth_run;

pub struct Worker {
    pub tid: usize,
    off: Vec<u64>,
    residual: Vec<u64>,
    bad_bits: Vec<bool>,
}

impl Worker {
    pub fn new(tid: usize) -> Self {
        Worker {
            tid,
            off: Vec::new(),
            residual: Vec::new(),
            bad_bits: Vec::new(),
        }
    }

    fn ensure_capacity(&mut self, pc: usize, win_len: usize) -> Result<(), SieveError> {
        if self.off.len() < pc {
            let grow = pc - self.off.len();
            self.off
                .try_reserve(grow)
                .map_err(|_| SieveError::Alloc { what: "worker scratch" })?;
            self.off.resize(pc, 0);
        }
        if self.residual.len() < win_len {
            let grow = win_len - self.residual.len();
            self.residual
                .try_reserve(grow)
                .map_err(|_| SieveError::Alloc { what: "worker scratch" })?;
            self.residual.resize(win_len, 0);
        }
        if self.bad_bits.len() < win_len {
            let grow = win_len - self.bad_bits.len();
            self.bad_bits
                .try_reserve(grow)
                .map_err(|_| SieveError::Alloc { what: "worker scratch" })?;
            self.bad_bits.resize(win_len, false);
        }
        Ok(())
    }

    /// Per-epoch initialization of carried offsets: computes
    /// `off[pi]` from scratch for this worker's first tile base of the new
    /// epoch. Subsequent tiles advance `off[pi]` via the carried SM update
    /// inside [`sieve_tile`] instead.
    fn init_offsets(&mut self, primes: &[u32], fd: &[Reciprocal], base_test0: u64) {
        for (pi, &p) in primes.iter().enumerate() {
            self.off[pi] = if p == 2 {
                base_test0 & 1
            } else {
                let r = fastmod(base_test0, fd[pi]);
                (p as u64 - r) % p as u64
            };
        }
    }

    /// Run this worker's share of one epoch: scan tiles along its stride
    /// until `end_limit` is exceeded, reporting any hit through `state`.
    pub fn run_epoch(
        &mut self,
        header: &EpochHeader,
        state: &EpochState,
        primes: &[u32],
        fd: &[Reciprocal],
        sm: &[u64],
    ) -> Result<(), SieveError> {
        let first_win_len = header.tile_len as usize + header.k as usize;
        self.ensure_capacity(primes.len(), first_win_len)?;

        let base_test0 = header.start_m + self.tid as u64 * header.tile_len + 1;
        self.init_offsets(primes, fd, base_test0);

        let mut base = header.start_m + self.tid as u64 * header.tile_len;
        loop {
            let lim = state.end_limit();
            if base > lim {
                break;
            }

            let start_count = std::cmp::min(header.tile_len, lim - base + 1) as usize;
            let win_len = start_count + header.k as usize;
            self.ensure_capacity(primes.len(), win_len)?;

            let base_test = base + 1;
            sieve_tile(
                base_test,
                win_len,
                primes,
                fd,
                sm,
                &mut self.off,
                &mut self.residual,
                &mut self.bad_bits,
            );

            if let Some(s) = first_smooth_run(&self.bad_bits, header.k, start_count) {
                state.try_set_best(base + s as u64);
            }

            base += header.step;
        }

        Ok(())
    }
}
