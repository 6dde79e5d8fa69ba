use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use smoothsieve::dispatcher::Dispatcher;
use smoothsieve::epoch::EpochController;
use smoothsieve::epoch_math::EpochMath;
use smoothsieve::fastmod::{fastmod, Reciprocal};
use smoothsieve::primes::primes_upto;
use smoothsieve::tile_sieve::sieve_tile;

fn bench_fastmod(c: &mut Criterion) {
    let r = Reciprocal::for_prime(65521);
    c.bench_function("fastmod(u64::MAX / 3, p=65521)", |b| {
        b.iter(|| fastmod(black_box(u64::MAX / 3), black_box(r)));
    });
}

fn bench_sieve_tile_single_tile(c: &mut Criterion) {
    let k = 1000u32;
    let tile_len = 65536usize;
    let base_test = 1_000_000u64;
    let win_len = tile_len + k as usize;

    let primes = primes_upto(k).unwrap();
    let fd: Vec<Reciprocal> = primes.iter().map(|&p| Reciprocal::for_prime(p)).collect();
    let step = 65536u64;
    let sm: Vec<u64> = primes
        .iter()
        .map(|&p| {
            if p == 2 {
                step & 1
            } else {
                fastmod(step, Reciprocal::for_prime(p))
            }
        })
        .collect();

    c.bench_function("sieve_tile(k=1000, tile_len=65536)", |b| {
        b.iter_batched(
            || {
                let off: Vec<u64> = primes
                    .iter()
                    .map(|&p| {
                        let p = p as u64;
                        let r = base_test % p;
                        (p - r) % p
                    })
                    .collect();
                let residual = vec![0u64; win_len];
                let bad_bits = vec![false; win_len];
                (off, residual, bad_bits)
            },
            |(mut off, mut residual, mut bad_bits)| {
                sieve_tile(
                    black_box(base_test),
                    black_box(win_len),
                    &primes,
                    &fd,
                    &sm,
                    &mut off,
                    &mut residual,
                    &mut bad_bits,
                );
                black_box(&bad_bits);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_primes_upto(c: &mut Criterion) {
    c.bench_function("primes_upto(100_000)", |b| {
        b.iter(|| primes_upto(black_box(100_000)));
    });
}

fn bench_small_k_loop(c: &mut Criterion) {
    // A small full k-loop (k=1..48) on a 2-thread pool, exercising the
    // dispatcher/epoch/worker/tile_sieve/window_scan pipeline end to end.
    c.bench_function("k_loop(K=48, threads=2, tile_len=64, batch_tiles=4)", |b| {
        b.iter(|| {
            let thread_count = 2usize;
            let tile_len = 64u64;
            let batch_tiles = 4u64;
            let step = tile_len * thread_count as u64;

            let dispatcher = Dispatcher::start(thread_count).unwrap();
            let controller = EpochController {
                tile_len,
                batch_tiles,
                thread_count,
            };

            let mut start_m = 0u64;
            for k in 1u32..=48 {
                let primes = primes_upto(k).unwrap();
                let math = EpochMath::build(&primes, step).unwrap();
                let primes: Arc<[u32]> = primes.into();
                let fd: Arc<[Reciprocal]> = math.fd.into();
                let sm: Arc<[u64]> = math.sm.into();
                start_m = controller
                    .find_m(k, start_m, &dispatcher, &primes, &fd, &sm)
                    .unwrap();
            }

            dispatcher.shutdown();
            black_box(start_m);
        });
    });
}

criterion_group!(
    benches,
    bench_fastmod,
    bench_sieve_tile_single_tile,
    bench_primes_upto,
    bench_small_k_loop,
);
criterion_main!(benches);
