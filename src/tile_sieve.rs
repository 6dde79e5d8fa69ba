//! # TileSieve — Strip Prime Factors From a Window (C4)
//!
//! The hot loop: for a tile of `start_count` start positions based at
//! `base_test = m0 + 1`, strip every prime ≤ k from each position in the
//! window `[base_test, base_test + win_len)` (`win_len = start_count + k`,
//! the extra `k` covering the lookahead [`crate::window_scan`] needs) and
//! classify each position as k-smooth or not.
//!
//! Convention: a bit is set iff its position is k-smooth. A run of k
//! consecutive set bits is a hit. (This crate's normalization of "bad" to
//! mean smooth rather than non-smooth is documented in `DESIGN.md`.)
//!
//! Carried offsets (`off[pi]`) let this run without any modular reduction at
//! a tile boundary: each call both consumes the offsets left by the previous
//! tile and advances them for the next one, using only the precomputed
//! stride-mod-p residue (`sm[pi]`).

use crate::fastmod::{divide_if_divisible, Reciprocal};

/// Process one tile for one worker. `off`, `residual`, and `bad_bits` are the
/// worker's own scratch buffers (sized to at least `win_len` / `primes.len()`
/// by the caller); they are overwritten in place.
///
/// `bad_bits[i]` is set iff `base_test + i` is k-smooth, for `i` in
/// `[0, win_len)`. On return, `off[pi]` has been advanced to describe the
/// next tile (`base_test + step`), per invariant W2.
pub fn sieve_tile(
    base_test: u64,
    win_len: usize,
    primes: &[u32],
    fd: &[Reciprocal],
    sm: &[u64],
    off: &mut [u64],
    residual: &mut [u64],
    bad_bits: &mut [bool],
) {
    for (i, slot) in residual[..win_len].iter_mut().enumerate() {
        *slot = base_test + i as u64;
    }
    for b in bad_bits[..win_len].iter_mut() {
        *b = false;
    }

    for pi in 0..primes.len() {
        let p = primes[pi] as u64;

        // A prime whose next hit falls outside this window can never mark a
        // position here; skip the strip loop but still advance the carried
        // offset below.
        if off[pi] < win_len as u64 {
            let mut i = off[pi] as usize;
            if p == 2 {
                while i < win_len {
                    let x = residual[i];
                    residual[i] = x >> x.trailing_zeros();
                    i += 2;
                }
            } else {
                let r = fd[pi];
                while i < win_len {
                    while divide_if_divisible(&mut residual[i], r) {}
                    i += p as usize;
                }
            }
        }

        let s = sm[pi];
        off[pi] = if off[pi] >= s {
            off[pi] - s
        } else {
            off[pi] + p - s
        };
    }

    for i in 0..win_len {
        bad_bits[i] = residual[i] == 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primes::primes_upto;

    fn naive_bad_bits(base_test: u64, win_len: usize, k: u32) -> Vec<bool> {
        (0..win_len)
            .map(|i| is_k_smooth(base_test + i as u64, k))
            .collect()
    }

    fn is_k_smooth(mut n: u64, k: u32) -> bool {
        if n <= 1 {
            return true;
        }
        let mut d = 2u64;
        while d * d <= n {
            while n % d == 0 {
                n /= d;
            }
            d += 1;
        }
        // n is now 1 or a prime factor > sqrt(original n)
        n == 1 || n <= k as u64
    }

    fn setup(k: u32, base_test: u64) -> (Vec<u32>, Vec<Reciprocal>, Vec<u64>, Vec<u64>) {
        let primes = primes_upto(k).unwrap();
        let fd: Vec<Reciprocal> = primes.iter().map(|&p| Reciprocal::for_prime(p)).collect();
        let sm: Vec<u64> = vec![0u64; primes.len()];
        let off: Vec<u64> = primes
            .iter()
            .map(|&p| {
                let p = p as u64;
                let r = base_test % p;
                (p - r) % p
            })
            .collect();
        (primes, fd, sm, off)
    }

    #[test]
    fn bad_bits_matches_trial_division_oracle() {
        for k in [1u32, 2, 3, 5, 8, 13, 20] {
            let base_test = 1u64;
            let win_len = 40;
            let (primes, fd, sm, mut off) = setup(k, base_test);
            let mut residual = vec![0u64; win_len];
            let mut bad_bits = vec![false; win_len];
            sieve_tile(base_test, win_len, &primes, &fd, &sm, &mut off, &mut residual, &mut bad_bits);

            let expected = naive_bad_bits(base_test, win_len, k);
            assert_eq!(bad_bits, expected, "k={k}");
        }
    }

    #[test]
    fn carried_offsets_satisfy_invariant_w2() {
        let k = 7u32;
        let step = 37u64;
        let base_test = 101u64;
        let win_len = 25;
        let (primes, fd, mut sm, mut off) = setup(k, base_test);
        for (i, &p) in primes.iter().enumerate() {
            let p = p as u64;
            sm[i] = step % p;
        }
        let mut residual = vec![0u64; win_len];
        let mut bad_bits = vec![false; win_len];
        sieve_tile(base_test, win_len, &primes, &fd, &sm, &mut off, &mut residual, &mut bad_bits);

        for (pi, &p) in primes.iter().enumerate() {
            let p = p as u64;
            assert!(off[pi] < p);
            assert_eq!((base_test + step + off[pi]) % p, 0, "p={p}");
        }
    }
}
