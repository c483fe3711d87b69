//! Blocking entropy pool with bit-length accounting
//!
//! The pool is a single arbitrary-precision accumulator. Available entropy is
//! measured as the bit length of the pool value, so leading-zero bits are
//! stored but not counted — that quirk of the accounting is part of the
//! contract and is preserved as literal, testable behavior.
//!
//! # Algorithm
//!
//! Accumulation gathers rounds of five jitter samples, concatenates their
//! minimal binary renderings, and mixes the result into the pool under a
//! fixed 32-bit left shift with XOR. A round never runs once the pool holds
//! 4096 bits; below 512 bits, rounds repeat until the watermark is met.
//! Extraction takes the low-order bits and shrinks the pool by exactly the
//! extracted size, blocking (by driving accumulation) until enough bits
//! exist.
//!
//! # Concurrency
//!
//! All state sits behind one mutex, and every public operation holds the
//! guard for its full duration, so an accumulate-then-extract request is a
//! single atomic critical section even when the pool is shared.

use crate::{
    metrics::Metrics,
    source::JitterSource,
    whiten::Whitener,
    Error, Result, MIX_SHIFT_BITS, POOL_CAPACITY_BITS, POOL_LOW_WATERMARK_BITS, SAMPLES_PER_ROUND,
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Blocking entropy pool fed by a jitter source.
pub struct EntropyPool {
    inner: Mutex<PoolInner>,
    whitener: Whitener,
    metrics: Metrics,
}

struct PoolInner {
    bits: BigUint,
    source: Box<dyn JitterSource>,
}

impl EntropyPool {
    /// Create an empty pool drawing from `source`.
    pub fn new(source: Box<dyn JitterSource>, whitener: Whitener, metrics: Metrics) -> Self {
        Self {
            inner: Mutex::new(PoolInner {
                bits: BigUint::zero(),
                source,
            }),
            whitener,
            metrics,
        }
    }

    /// Bits currently available, measured as the bit length of the pool
    /// content (0 for an empty pool).
    pub fn available_bits(&self) -> u64 {
        self.inner.lock().bits.bits()
    }

    /// Run one full accumulation cycle.
    ///
    /// A no-op once [`POOL_CAPACITY_BITS`] are available. Otherwise gathers
    /// rounds of samples until at least [`POOL_LOW_WATERMARK_BITS`] are held
    /// or the capacity check trips. Blocks for the duration of the probe
    /// calls, which may be unbounded if the probe keeps failing.
    pub fn accumulate(&self) {
        let mut inner = self.inner.lock();
        self.accumulate_locked(&mut inner);
    }

    fn accumulate_locked(&self, inner: &mut PoolInner) {
        loop {
            if inner.bits.bits() >= POOL_CAPACITY_BITS {
                return;
            }
            self.accumulate_round(inner);
            if inner.bits.bits() >= POOL_LOW_WATERMARK_BITS {
                return;
            }
        }
    }

    /// One accumulation round: up to [`SAMPLES_PER_ROUND`] probe attempts,
    /// concatenated as binary text, then mixed under the fixed shift.
    fn accumulate_round(&self, inner: &mut PoolInner) {
        let mut round = String::new();
        let mut contributed = 0usize;

        for _ in 0..SAMPLES_PER_ROUND {
            match inner.source.sample() {
                Ok(value) => {
                    // Minimal binary rendering: a zero sample contributes "0"
                    round.push_str(&format!("{:b}", value));
                    contributed += 1;
                    self.metrics.record_sample();
                }
                Err(e) => {
                    debug!(error = %e, "jitter sample skipped");
                    self.metrics.record_sample_failure();
                }
            }
        }

        if contributed == 0 {
            warn!("all probe attempts failed this round, mixing empty material");
        }

        let fresh = if round.is_empty() {
            BigUint::zero()
        } else {
            // The round buffer only ever holds '0'/'1' characters
            BigUint::parse_bytes(round.as_bytes(), 2).unwrap_or_default()
        };

        inner.bits = (&inner.bits << MIX_SHIFT_BITS) ^ fresh;
        self.metrics.record_round();
        debug!(
            contributed,
            available = inner.bits.bits(),
            "accumulation round mixed"
        );
    }

    /// Draw bits from the pool.
    ///
    /// With `Some(n)` the call blocks (driving accumulation) until `n` bits
    /// are available, then returns the low-order `n` bits and shrinks the
    /// pool by exactly `n`. Requests above [`POOL_CAPACITY_BITS`] may never
    /// become satisfiable, in which case the call blocks indefinitely.
    /// `Some(0)` is rejected with [`Error::InvalidRequest`].
    ///
    /// With `None` the call runs one accumulation cycle and drains the whole
    /// pool, with no minimum size guarantee.
    pub fn extract(&self, num_bits: Option<u64>) -> Result<BigUint> {
        let mut inner = self.inner.lock();
        self.extract_locked(&mut inner, num_bits)
    }

    fn extract_locked(&self, inner: &mut PoolInner, num_bits: Option<u64>) -> Result<BigUint> {
        match num_bits {
            Some(0) => Err(Error::InvalidRequest(
                "cannot extract zero bits".to_string(),
            )),
            Some(n) => {
                while inner.bits.bits() < n {
                    self.accumulate_locked(inner);
                }
                let mask = (BigUint::one() << n) - BigUint::one();
                let extracted = &inner.bits & &mask;
                inner.bits >>= n;
                self.metrics.record_extraction(n);
                debug!(requested = n, remaining = inner.bits.bits(), "extracted bits");
                Ok(extracted)
            }
            None => {
                self.accumulate_locked(inner);
                let drained = std::mem::take(&mut inner.bits);
                self.metrics.record_extraction(drained.bits());
                debug!(drained = drained.bits(), "drained pool");
                Ok(drained)
            }
        }
    }

    /// Whitened random output.
    ///
    /// Extracts per [`EntropyPool::extract`] under the same critical section,
    /// hashes the canonical decimal rendering of the sequence, and returns
    /// the raw digest. Output length is the whitener's digest length
    /// regardless of `num_bits`.
    pub fn random(&self, num_bits: Option<u64>) -> Result<Vec<u8>> {
        let seq = {
            let mut inner = self.inner.lock();
            self.extract_locked(&mut inner, num_bits)?
        };
        let digest = self.whitener.whiten_sequence(&seq);
        self.metrics.record_digest();
        Ok(digest)
    }

    /// Digest length of whitened output in bytes.
    pub fn digest_len(&self) -> usize {
        self.whitener.digest_len()
    }

    #[cfg(test)]
    fn set_bits(&self, bits: BigUint) {
        self.inner.lock().bits = bits;
    }

    #[cfg(test)]
    fn bits_snapshot(&self) -> BigUint {
        self.inner.lock().bits.clone()
    }
}
