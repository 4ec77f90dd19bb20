//! # HyperStream Core
//!
//! Bit-packed hypervector primitives for hyperdimensional computing:
//!
//! - **Containers**: [`BinaryHv`] (packed 64-bit words with a hard tail
//!   invariant) and [`TypedHv`] (dense elements for cosine similarity).
//! - **Algebra**: XOR bind, majority bundling, bit rotation, Hamming and
//!   cosine similarity ([`ops`], [`bundler`]).
//! - **Backends**: scalar / SSE2 / AVX2 / NEON word kernels behind a runtime
//!   selection policy with bit-exact cross-backend equivalence ([`backend`]).
//! - **Determinism**: SplitMix64 PRNG and seeded FNV-1a hashing shared by
//!   every encoder ([`rng`], [`hash`]).
//! - **Configuration**: compile-time profiles and storage estimators
//!   ([`config`]).
//!
//! Single-threaded by contract: no locks, no atomics beyond one-time CPU
//! feature caching. Callers sharing stores across threads synchronize
//! externally.

pub mod backend;
pub mod batch;
pub mod bundler;
pub mod config;
pub mod hash;
pub mod hv;
pub mod ops;
pub mod rng;

pub use backend::{
    bind_words_auto, cpu_feature_mask, hamming_threshold, hamming_threshold_overridden,
    hamming_words_auto, report, BackendKind, CpuFeature, PolicyReport,
};
pub use batch::{hamming_batch, hamming_top_k};
pub use bundler::BinaryBundler;
pub use config::{config_report, ConfigReport, ACTIVE_PROFILE};
pub use hash::{double_hash, fnv1a_64};
pub use hv::{word_count_for, BinaryHv, Complex32, Complex64, HvElement, TypedHv};
pub use rng::{generate_random_hv, mix_symbol, SplitMix64};
