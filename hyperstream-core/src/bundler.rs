//! Streaming majority bundling.
//!
//! Accumulates ±1 votes per bit and thresholds once at the end, so long
//! streams do not drift the way repeated pairwise majority would. The
//! default counter is a saturating `i16`: ±32,767 votes per bit comfortably
//! exceeds typical bundling runs, the counter array stays half the size of
//! an `i32` bank, and more than 2^32 accumulations of a constant input
//! cannot overflow. The `wide-bundler` feature switches to plain `i32`
//! counters without saturation.

use crate::hv::BinaryHv;

#[cfg(feature = "wide-bundler")]
type Counter = i32;
#[cfg(not(feature = "wide-bundler"))]
type Counter = i16;

/// Per-bit signed vote counters with a single final threshold.
///
/// `finalize` writes bit `i` as `counter[i] >= 0`; a zero counter (a tie, or
/// a bundler that never accumulated) therefore produces a set bit, and
/// finalizing a freshly reset bundler yields the all-ones vector. Use
/// [`count`](Self::count) to guard against consuming an empty bundle.
pub struct BinaryBundler {
    dim: usize,
    counters: Vec<Counter>,
    accumulated: u64,
}

impl BinaryBundler {
    /// Create a bundler for `dim`-bit inputs with all counters at zero.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "BinaryBundler dimension must be > 0");
        Self {
            dim,
            counters: vec![0; dim],
            accumulated: 0,
        }
    }

    /// Dimension in bits.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Zero all counters and the accumulation count.
    pub fn reset(&mut self) {
        self.counters.fill(0);
        self.accumulated = 0;
    }

    /// Number of `accumulate` calls since construction or the last reset.
    #[inline]
    pub fn count(&self) -> u64 {
        self.accumulated
    }

    /// True if nothing has been accumulated since the last reset.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accumulated == 0
    }

    /// Add one vote per bit: +1 where `hv` is set, -1 where it is clear.
    ///
    /// # Panics
    /// Panics if `hv.dim() != self.dim()`.
    pub fn accumulate(&mut self, hv: &BinaryHv) {
        assert_eq!(hv.dim(), self.dim, "accumulate: dimension mismatch");
        #[cfg(feature = "wide-bundler")]
        {
            for (i, counter) in self.counters.iter_mut().enumerate() {
                *counter += if hv.get_bit(i) { 1 } else { -1 };
            }
        }
        #[cfg(not(feature = "wide-bundler"))]
        {
            for (i, counter) in self.counters.iter_mut().enumerate() {
                *counter = if hv.get_bit(i) {
                    counter.saturating_add(1)
                } else {
                    counter.saturating_sub(1)
                };
            }
        }
        self.accumulated += 1;
    }

    /// Threshold the counters into `out`: bit `i` is `counter[i] >= 0`.
    ///
    /// # Panics
    /// Panics if `out.dim() != self.dim()`.
    pub fn finalize(&self, out: &mut BinaryHv) {
        assert_eq!(out.dim(), self.dim, "finalize: dimension mismatch");
        out.clear();
        for (i, &counter) in self.counters.iter().enumerate() {
            if counter >= 0 {
                out.set_bit(i, true);
            }
        }
    }
}
