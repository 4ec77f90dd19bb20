//! SIMD backends and runtime dispatch.
//!
//! Every backend exposes the same two word-level kernels over contiguous
//! `u64` buffers with unaligned I/O:
//!
//! - `bind_words(a, b, out)`: word-wise XOR
//! - `hamming_words(a, b) -> usize`: total popcount of a ^ b
//!
//! The contract is bit-exact equivalence: for any word count and any inputs,
//! all backends produce identical `bind_words` outputs and identical
//! `hamming_words` totals. SIMD paths are semantic no-ops relative to the
//! scalar reference; [`policy`] picks among them per operation and dimension.

pub mod capability;
pub mod policy;
pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod avx2;
#[cfg(target_arch = "x86_64")]
pub mod sse2;

#[cfg(target_arch = "aarch64")]
pub mod neon;

pub use capability::{cpu_feature_mask, has_feature, CpuFeature};
pub use policy::{
    bind_words_auto, hamming_threshold, hamming_threshold_overridden, hamming_words_auto, report,
    BackendKind, Decision, PolicyReport, DEFAULT_HAMMING_SSE2_THRESHOLD,
};
