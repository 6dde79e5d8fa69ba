//! # smoothsieve — Strided Tiled Smoothness Sieve
//!
//! For each k in `1..=K`, finds the smallest nonnegative m such that
//! `m+1, m+2, …, m+k` are all k-smooth (every prime factor ≤ k). Since m(k)
//! is non-decreasing in k, each search starts from the previous result.
//!
//! ## Pipeline
//!
//! [`primes`] → [`epoch_math`] → [`worker`] (per-thread carried offsets) →
//! [`tile_sieve`] → [`window_scan`] → [`epoch`]'s `best_m`.
//!
//! [`dispatcher`] fans epoch-start/stop signals out to a pool of long-lived
//! worker threads and fans the completion signal back in; [`epoch`]'s
//! `EpochController` drives successive batches until a hit is found.
//!
//! ## Module Organization
//!
//! - [`fastmod`] — multiply-high remainder/divmod, replacing hardware idiv
//!   in the hot factor-stripping loop.
//! - [`primes`] — sieve of Eratosthenes for the primes ≤ k.
//! - [`epoch_math`] — per-epoch reciprocal and stride-mod-p tables.
//! - [`tile_sieve`] — strips prime factors from a tile, flags smooth
//!   positions.
//! - [`window_scan`] — rolling-popcount scan for the first run of k smooth
//!   positions.
//! - [`worker`] — per-thread epoch loop: carried offsets, tile iteration,
//!   candidate reporting.
//! - [`dispatcher`] — start/stop broadcast and completion latch for the
//!   worker pool.
//! - [`epoch`] — shared epoch atomics and the batch-loop controller.
//! - [`progress`] — background progress reporting.
//! - [`error`] — typed failure modes.

pub mod dispatcher;
pub mod epoch;
pub mod epoch_math;
pub mod error;
pub mod fastmod;
pub mod primes;
pub mod progress;
pub mod tile_sieve;
pub mod window_scan;
pub mod worker;
