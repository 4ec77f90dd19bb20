//! Backend selection policy.
//!
//! Chooses a kernel per operation and dimension from the runtime feature
//! mask. Bind always prefers the widest vectors available; Hamming prefers
//! SSE2 over AVX2 once the dimension crosses a threshold (the lane-extract
//! popcount wins on large buffers on the host classes this was measured on).
//!
//! The threshold is read from `HYPERSTREAM_HAMMING_SSE2_THRESHOLD` on every
//! query and never cached, so tests that set and unset the variable observe
//! the change.

use tracing::warn;

use super::capability::{cpu_feature_mask, has_feature, CpuFeature};
use super::scalar;

/// Environment variable holding the Hamming SSE2-preference threshold.
pub const HAMMING_THRESHOLD_ENV: &str = "HYPERSTREAM_HAMMING_SSE2_THRESHOLD";

/// Compile-time default for the Hamming SSE2-preference dimension threshold.
pub const DEFAULT_HAMMING_SSE2_THRESHOLD: usize = 16384;

fn parse_threshold_env() -> Option<usize> {
    let raw = std::env::var(HAMMING_THRESHOLD_ENV).ok()?;
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<usize>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            warn!(
                value = %raw,
                "ignoring invalid {}; using default {}",
                HAMMING_THRESHOLD_ENV,
                DEFAULT_HAMMING_SSE2_THRESHOLD
            );
            None
        }
    }
}

/// Dimension threshold above which Hamming prefers SSE2 when both SIMD sets
/// are present. Environment override wins when it parses as a positive
/// base-10 integer; anything else falls back to the default.
pub fn hamming_threshold() -> usize {
    parse_threshold_env().unwrap_or(DEFAULT_HAMMING_SSE2_THRESHOLD)
}

/// True when the environment variable is set to a valid positive integer.
pub fn hamming_threshold_overridden() -> bool {
    parse_threshold_env().is_some()
}

/// Kind of backend selected by the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Scalar,
    Sse2,
    Avx2,
    Neon,
}

impl BackendKind {
    /// Short lowercase name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            BackendKind::Scalar => "scalar",
            BackendKind::Sse2 => "sse2",
            BackendKind::Avx2 => "avx2",
            BackendKind::Neon => "neon",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A policy decision: which backend and a short reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub kind: BackendKind,
    pub reason: &'static str,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.reason)
    }
}

/// Decide the bind backend for a dimension and feature mask.
///
/// Widest-first; no dimension heuristic.
pub fn decide_bind(_dim_bits: usize, feature_mask: u32) -> Decision {
    if cfg!(feature = "force-scalar") {
        return Decision {
            kind: BackendKind::Scalar,
            reason: "forced scalar",
        };
    }
    if has_feature(feature_mask, CpuFeature::Avx2) {
        return Decision {
            kind: BackendKind::Avx2,
            reason: "wider vectors (256b)",
        };
    }
    if has_feature(feature_mask, CpuFeature::Sse2) {
        return Decision {
            kind: BackendKind::Sse2,
            reason: "SSE2 available",
        };
    }
    if has_feature(feature_mask, CpuFeature::Neon) {
        return Decision {
            kind: BackendKind::Neon,
            reason: "NEON available",
        };
    }
    Decision {
        kind: BackendKind::Scalar,
        reason: "no SIMD detected",
    }
}

/// Decide the Hamming backend for a dimension and feature mask.
///
/// Same ordering as bind, except large dimensions prefer SSE2 over AVX2
/// when both are present.
pub fn decide_hamming(dim_bits: usize, feature_mask: u32) -> Decision {
    if cfg!(feature = "force-scalar") {
        return Decision {
            kind: BackendKind::Scalar,
            reason: "forced scalar",
        };
    }
    if has_feature(feature_mask, CpuFeature::Avx2) {
        if dim_bits >= hamming_threshold() && has_feature(feature_mask, CpuFeature::Sse2) {
            return Decision {
                kind: BackendKind::Sse2,
                reason: "preferred for large dims (threshold heuristic)",
            };
        }
        return Decision {
            kind: BackendKind::Avx2,
            reason: "wider vectors (256b)",
        };
    }
    if has_feature(feature_mask, CpuFeature::Sse2) {
        return Decision {
            kind: BackendKind::Sse2,
            reason: "SSE2 available",
        };
    }
    if has_feature(feature_mask, CpuFeature::Neon) {
        return Decision {
            kind: BackendKind::Neon,
            reason: "NEON available",
        };
    }
    Decision {
        kind: BackendKind::Scalar,
        reason: "no SIMD detected",
    }
}

/// Word-level bind kernel signature.
pub type BindWordsFn = fn(&[u64], &[u64], &mut [u64]);
/// Word-level Hamming kernel signature.
pub type HammingWordsFn = fn(&[u64], &[u64]) -> usize;

/// Resolve the bind kernel for a decision on this compilation target.
///
/// Backends not compiled for the target degrade to scalar; the decision is
/// advisory, the kernel contract is identical either way.
pub fn select_bind(dim_bits: usize, feature_mask: u32) -> BindWordsFn {
    let decision = decide_bind(dim_bits, feature_mask);
    kernel_for_bind(decision.kind)
}

/// Resolve the Hamming kernel for a decision on this compilation target.
pub fn select_hamming(dim_bits: usize, feature_mask: u32) -> HammingWordsFn {
    let decision = decide_hamming(dim_bits, feature_mask);
    kernel_for_hamming(decision.kind)
}

fn kernel_for_bind(kind: BackendKind) -> BindWordsFn {
    match kind {
        #[cfg(target_arch = "x86_64")]
        BackendKind::Avx2 => super::avx2::bind_words,
        #[cfg(target_arch = "x86_64")]
        BackendKind::Sse2 => super::sse2::bind_words,
        #[cfg(target_arch = "aarch64")]
        BackendKind::Neon => super::neon::bind_words,
        _ => scalar::bind_words,
    }
}

fn kernel_for_hamming(kind: BackendKind) -> HammingWordsFn {
    match kind {
        #[cfg(target_arch = "x86_64")]
        BackendKind::Avx2 => super::avx2::hamming_words,
        #[cfg(target_arch = "x86_64")]
        BackendKind::Sse2 => super::sse2::hamming_words,
        #[cfg(target_arch = "aarch64")]
        BackendKind::Neon => super::neon::hamming_words,
        _ => scalar::hamming_words,
    }
}

/// XOR-bind word buffers through the policy using the host feature mask.
#[inline]
pub fn bind_words_auto(dim_bits: usize, a: &[u64], b: &[u64], out: &mut [u64]) {
    select_bind(dim_bits, cpu_feature_mask())(a, b, out)
}

/// Hamming distance over word buffers through the policy using the host
/// feature mask.
#[inline]
pub fn hamming_words_auto(dim_bits: usize, a: &[u64], b: &[u64]) -> usize {
    select_hamming(dim_bits, cpu_feature_mask())(a, b)
}

/// Summary of policy decisions for a dimension and feature mask.
#[derive(Clone, Copy, Debug)]
pub struct PolicyReport {
    pub dim_bits: usize,
    pub feature_mask: u32,
    pub bind: Decision,
    pub hamming: Decision,
}

impl std::fmt::Display for PolicyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dim={} mask={:#06b} bind={} hamming={}",
            self.dim_bits, self.feature_mask, self.bind, self.hamming
        )
    }
}

/// Report backend selections and reasons for `dim_bits` under
/// `feature_mask`.
pub fn report(dim_bits: usize, feature_mask: u32) -> PolicyReport {
    PolicyReport {
        dim_bits,
        feature_mask,
        bind: decide_bind(dim_bits, feature_mask),
        hamming: decide_hamming(dim_bits, feature_mask),
    }
}
