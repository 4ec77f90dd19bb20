use hyperstream_core::hash::{fnv1a_64, TOKEN_SALT};
use hyperstream_core::rng::generate_random_hv;
use hyperstream_core::BinaryHv;

/// Deterministic item memory mapping ids and tokens to hypervectors.
///
/// Stateless beyond the seed: `encode_id` streams SplitMix64 words from the
/// seed/symbol mix, `encode_token` first collapses the token to a symbol
/// with salted FNV-1a. Safe for concurrent reads.
pub struct ItemMemory {
    dim: usize,
    seed: u64,
}

impl ItemMemory {
    /// Create an item memory for `dim`-bit vectors.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, seed: u64) -> Self {
        assert!(dim > 0, "ItemMemory dimension must be > 0");
        Self { dim, seed }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Write the hypervector for a 64-bit id into `out`.
    ///
    /// # Panics
    /// Panics if `out.dim() != self.dim()`.
    pub fn encode_id(&self, id: u64, out: &mut BinaryHv) {
        assert_eq!(out.dim(), self.dim, "encode_id: dimension mismatch");
        generate_random_hv(self.seed, id, out);
    }

    /// Write the hypervector for a token into `out`.
    pub fn encode_token(&self, token: &str, out: &mut BinaryHv) {
        let symbol = fnv1a_64(token.as_bytes(), self.seed ^ TOKEN_SALT);
        self.encode_id(symbol, out);
    }
}
