//! # Error — Typed Failure Modes
//!
//! A small `thiserror`-derived enum for the handful of ways this search can
//! fail: allocation, thread start, and (defensively) scan-cursor overflow.
//! There are no recoverable errors inside the hot path — every input there is
//! pre-validated before a worker's loop begins.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SieveError {
    #[error("allocation failed for {what}")]
    Alloc { what: &'static str },

    #[error("failed to spawn worker thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),

    #[error("scan cursor overflowed before a hit was found for k={k}")]
    CursorOverflow { k: u32 },
}
