//! # CLI — Argument Parsing and Search Orchestration
//!
//! Extracted from `main.rs` to keep the entry point slim. Owns the k = 1..K
//! loop: for each k, build the prime list and epoch math, drive the
//! [`EpochController`] across however many batches it takes, and print the
//! plateau-points contract on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info_span;

use smoothsieve::dispatcher::Dispatcher;
use smoothsieve::epoch::EpochController;
use smoothsieve::epoch_math::EpochMath;
use smoothsieve::primes::primes_upto;
use smoothsieve::progress::Progress;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Human,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "smoothsieve",
    about = "For each k in 1..=K, find the smallest m such that m+1..m+k are all k-smooth"
)]
pub struct Cli {
    /// Upper bound on k: the search runs once for every k in [1, K].
    #[arg(default_value_t = 200)]
    pub k_max: u32,

    /// Worker thread count. 0 resolves to all logical CPUs.
    #[arg(default_value_t = 0)]
    pub threads: usize,

    /// Start positions scanned per tile.
    #[arg(default_value_t = 65536)]
    pub tile_len: u64,

    /// Tiles scanned per epoch batch.
    #[arg(default_value_t = 128)]
    pub batch_tiles: u64,

    /// Log output format for progress/diagnostics written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,

    /// Suppress the periodic progress reporter on stderr. Stdout output is
    /// unaffected either way.
    #[arg(long)]
    pub quiet: bool,
}

/// Resolve the CLI's `threads` parameter: 0 means "all logical CPUs"; any
/// explicit value is clamped to the available CPU count, per spec.md §6
/// ("Worker thread count... clamped to available CPUs").
pub fn resolve_thread_count(threads: usize) -> usize {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if threads > 0 {
        threads.min(available)
    } else {
        available
    }
}

/// Run the full k = 1..=K search and print the plateau-points contract.
pub fn run(cli: &Cli) -> Result<()> {
    let thread_count = resolve_thread_count(cli.threads);
    tracing::info!(
        thread_count,
        k_max = cli.k_max,
        tile_len = cli.tile_len,
        batch_tiles = cli.batch_tiles,
        "starting smoothness search"
    );

    let progress = Progress::new();
    let reporter = (!cli.quiet).then(|| progress.start_reporter());

    let dispatcher = Dispatcher::start(thread_count).context("starting worker pool")?;
    let controller = EpochController {
        tile_len: cli.tile_len,
        batch_tiles: cli.batch_tiles,
        thread_count,
    };
    let step = cli.tile_len * thread_count as u64;

    println!("; plateau points: k, m");

    let mut start_m = 0u64;
    let mut last_printed: Option<u64> = None;

    for k in 1..=cli.k_max {
        let span = info_span!("k_search", k);
        let _enter = span.enter();

        let primes: Arc<[u32]> = primes_upto(k).context("building prime list")?.into();
        let math = EpochMath::build(&primes, step).context("building epoch math tables")?;
        let fd: Arc<[_]> = math.fd.into();
        let sm: Arc<[u64]> = math.sm.into();

        let m = controller.find_m(k, start_m, &dispatcher, &primes, &fd, &sm)?;

        progress.record(k, m);
        if last_printed != Some(m) {
            println!("{k}, {m}");
            last_printed = Some(m);
        }

        start_m = m;
    }

    progress.stop();
    if let Some(handle) = reporter {
        let _ = handle.join();
    }
    dispatcher.shutdown();

    Ok(())
}
