//! Deterministic encoders from raw inputs to binary hypervectors.
//!
//! Every encoder is a pure function of its construction parameters and the
//! call sequence: equal configuration and equal inputs produce bit-identical
//! output on every platform and backend. Randomness comes only from the
//! seeded SplitMix64 stream, token hashing only from seeded FNV-1a, and the
//! unary/thermometer codes use a fixed low-discrepancy index order.
//!
//! Streaming encoders ([`RandomBasisEncoder`], [`HashEncoder`],
//! [`UnaryIntensityEncoder`], [`SequentialNGramEncoder`]) follow the
//! `reset` / `update` / `finalize` shape with an internal
//! [`BinaryBundler`](hyperstream_core::BinaryBundler); the stateless ones
//! ([`ItemMemory`], [`SymbolEncoder`], [`ThermometerEncoder`],
//! [`RandomProjectionEncoder`]) write straight into a caller-provided
//! output vector.

mod encoders;
mod item_memory;
mod numeric;
mod symbol;

pub use encoders::{
    low_discrepancy_order, HashEncoder, RandomBasisEncoder, SequentialNGramEncoder,
    UnaryIntensityEncoder, DEFAULT_HASH_COUNT, DEFAULT_HASH_SEED, DEFAULT_NGRAM_SEED,
    DEFAULT_RANDOM_BASIS_SEED,
};
pub use item_memory::ItemMemory;
pub use numeric::{RandomProjectionEncoder, ThermometerEncoder};
pub use symbol::SymbolEncoder;
