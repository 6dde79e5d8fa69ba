//! # Dispatcher — Fan-Out/Fan-In Signaling (C8)
//!
//! The abstract requirement: a broadcast that delivers exactly one "start" to
//! each worker per epoch, and a one-shot latch the controller waits on,
//! released by the last worker to finish. A condition variable plus an
//! epoch counter and an active-worker count gives this without needing a
//! completion-port-style queue, and matches the `Arc<(Mutex<_>, Condvar)>`
//! wake-one-pool-of-threads pattern this crate's wider lineage already uses
//! for worker coordination (see the lazy-SMP thread pool this crate's search
//! infrastructure is modeled on).
//!
//! Workers are spawned once and live for the whole run, across every epoch
//! and every value of k: each owns one [`crate::worker::Worker`] for its
//! entire lifetime so scratch buffers are never reallocated between epochs
//! except to grow.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::epoch::{EpochHeader, EpochState};
use crate::error::SieveError;
use crate::fastmod::Reciprocal;
use crate::worker::Worker;

#[derive(Clone)]
struct EpochJob {
    header: EpochHeader,
    state: Arc<EpochState>,
    primes: Arc<[u32]>,
    fd: Arc<[Reciprocal]>,
    sm: Arc<[u64]>,
}

struct State {
    epoch: u64,
    stop: bool,
    active: usize,
    done: bool,
    job: Option<EpochJob>,
    error: Option<SieveError>,
}

struct Shared {
    state: Mutex<State>,
    cv_start: Condvar,
    cv_done: Condvar,
}

pub struct Dispatcher {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
    thread_count: usize,
}

impl Dispatcher {
    /// Spawn `thread_count` long-lived worker threads, parked waiting for
    /// the first epoch.
    pub fn start(thread_count: usize) -> Result<Self, SieveError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                epoch: 0,
                stop: false,
                active: 0,
                done: true,
                job: None,
                error: None,
            }),
            cv_start: Condvar::new(),
            cv_done: Condvar::new(),
        });

        let mut handles = Vec::with_capacity(thread_count);
        for tid in 0..thread_count {
            let shared = Arc::clone(&shared);
            let handle = std::thread::Builder::new()
                .name(format!("sieve-worker-{tid}"))
                .spawn(move || worker_loop(tid, shared))
                .map_err(SieveError::ThreadSpawn)?;
            handles.push(handle);
        }

        Ok(Dispatcher {
            shared,
            handles,
            thread_count,
        })
    }

    /// Run one epoch to completion: post one "start" to every worker, wait
    /// for the last one to finish (or error).
    pub fn run_epoch(
        &self,
        header: EpochHeader,
        state: Arc<EpochState>,
        primes: Arc<[u32]>,
        fd: Arc<[Reciprocal]>,
        sm: Arc<[u64]>,
    ) -> Result<(), SieveError> {
        let job = EpochJob {
            header,
            state,
            primes,
            fd,
            sm,
        };

        let mut guard = self.shared.state.lock().unwrap();
        guard.job = Some(job);
        guard.active = self.thread_count;
        guard.done = false;
        guard.error = None;
        guard.epoch += 1;
        self.shared.cv_start.notify_all();

        let mut guard = self
            .shared
            .cv_done
            .wait_while(guard, |s| !s.done)
            .unwrap();

        match guard.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Post "stop" to every worker and join their threads.
    pub fn shutdown(mut self) {
        {
            let mut guard = self.shared.state.lock().unwrap();
            guard.stop = true;
            self.shared.cv_start.notify_all();
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(tid: usize, shared: Arc<Shared>) {
    let mut worker = Worker::new(tid);
    let mut last_seen_epoch = 0u64;

    loop {
        let job = {
            let mut guard = shared.state.lock().unwrap();
            guard = shared
                .cv_start
                .wait_while(guard, |s| !s.stop && s.epoch == last_seen_epoch)
                .unwrap();
            if guard.stop {
                return;
            }
            last_seen_epoch = guard.epoch;
            guard.job.clone().expect("epoch started without a job")
        };

        let result = worker.run_epoch(&job.header, &job.state, &job.primes, &job.fd, &job.sm);

        let mut guard = shared.state.lock().unwrap();
        if let Err(e) = result {
            guard.error.get_or_insert(e);
        }
        guard.active = guard.active.saturating_sub(1);
        if guard.active == 0 {
            guard.done = true;
            shared.cv_done.notify_all();
        }
    }
}
