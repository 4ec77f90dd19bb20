//! Fixed-capacity associative memories.
//!
//! Three stores over binary hypervectors, all runtime-dimensioned,
//! capacity-bounded at construction, with no eviction and no replacement:
//!
//! - [`PrototypeMemory`]: append-only label/HV pairs, nearest-neighbour
//!   classification by Hamming match.
//! - [`ClusterMemory`]: per-label additive ±1 counter banks with majority
//!   thresholding and multiplicative decay.
//! - [`CleanupMemory`]: a dictionary of canonical vectors restoring noisy
//!   queries to their nearest stored entry.
//!
//! Every failing operation leaves the store unchanged; capacity zero is
//! legal and makes all mutations fail while queries return their empty-case
//! defaults. Not thread-safe: callers synchronize externally.

mod associative;

pub use associative::{
    ClusterMemory, ClusterView, CleanupMemory, MemoryError, PrototypeEntry, PrototypeMemory,
};
