//! # EpochMath — Per-Epoch Precomputation
//!
//! Builds the two tables every worker consults once per prime per tile: the
//! [`fastmod::Reciprocal`] used to strip that prime's factors, and the
//! stride-mod-p residue used to carry a worker's per-prime offset forward
//! from one tile to the next without any division (see [`crate::tile_sieve`]).
//!
//! Built once per value of k (primes ≤ k rarely change within a single k's
//! search) and freed when that k's search finishes, per the lifecycle in the
//! data model.

use crate::error::SieveError;
use crate::fastmod::{fastmod, Reciprocal};

pub struct EpochMath {
    /// FD[pi]: reciprocal for primes[pi].
    pub fd: Vec<Reciprocal>,
    /// SM[pi]: step mod primes[pi].
    pub sm: Vec<u64>,
}

impl EpochMath {
    /// Build FD[] and SM[] for `primes` and stride `step`. Fails only on
    /// allocation.
    pub fn build(primes: &[u32], step: u64) -> Result<Self, SieveError> {
        let mut fd = Vec::new();
        fd.try_reserve_exact(primes.len())
            .map_err(|_| SieveError::Alloc { what: "epoch math tables" })?;
        let mut sm = Vec::new();
        sm.try_reserve_exact(primes.len())
            .map_err(|_| SieveError::Alloc { what: "epoch math tables" })?;

        for &p in primes {
            let r = Reciprocal::for_prime(p);
            let s = if p == 2 { step & 1 } else { fastmod(step, r) };
            fd.push(r);
            sm.push(s);
        }

        Ok(EpochMath { fd, sm })
    }
}
