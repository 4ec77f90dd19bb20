//! # HyperStream
//!
//! Hyperdimensional computing over bit-packed binary hypervectors: a small
//! algebra (bind / bundle / permute / similarity), deterministic encoders
//! from raw symbols, scalars, and dense vectors into hypervector space,
//! fixed-capacity associative memories, and a versioned binary serialization
//! format with CRC integrity.
//!
//! The compute layer lives in [`hyperstream_core`] (re-exported here):
//! word-level SIMD kernels behind a runtime policy that guarantees
//! bit-identical results across scalar, SSE2, AVX2, and NEON backends.
//!
//! ```
//! use hyperstream::encoding::ItemMemory;
//! use hyperstream::memory::PrototypeMemory;
//! use hyperstream::BinaryHv;
//!
//! let dim = 2048;
//! let items = ItemMemory::new(dim, 0x1234_5678_9abc_def0);
//!
//! let mut apple = BinaryHv::new(dim);
//! let mut pear = BinaryHv::new(dim);
//! items.encode_token("apple", &mut apple);
//! items.encode_token("pear", &mut pear);
//!
//! let mut memory = PrototypeMemory::new(dim, 16);
//! memory.learn(1, &apple).unwrap();
//! memory.learn(2, &pear).unwrap();
//! assert_eq!(memory.classify(&apple, 0), 1);
//! ```

pub mod encoding;
pub mod io;
pub mod memory;

pub use hyperstream_core::{
    bind_words_auto, config_report, cpu_feature_mask, hamming_batch, hamming_threshold,
    hamming_threshold_overridden, hamming_top_k, hamming_words_auto, ops, report, BackendKind,
    BinaryBundler, BinaryHv, Complex32, ConfigReport, CpuFeature, HvElement, PolicyReport,
    SplitMix64, TypedHv, ACTIVE_PROFILE,
};
