use hyperstream_core::hash::double_hash;
use hyperstream_core::ops::{bind, permute_rotate};
use hyperstream_core::rng::generate_random_hv;
use hyperstream_core::{BinaryBundler, BinaryHv};

/// Default seed for [`RandomBasisEncoder`].
pub const DEFAULT_RANDOM_BASIS_SEED: u64 = 0x9e37_79b9_7f4a_7c15;
/// Default seed for [`SequentialNGramEncoder`].
pub const DEFAULT_NGRAM_SEED: u64 = 0x27d4_eb2f_1656_67c5;
/// Default seed for [`HashEncoder`].
pub const DEFAULT_HASH_SEED: u64 = 0x51ed_2701_f3a5_c7b9;
/// Default number of hashes per token for [`HashEncoder`].
pub const DEFAULT_HASH_COUNT: usize = 4;

/// Low-discrepancy permutation of `[0, dim)`.
///
/// Bit-reverses each index over enough bits to cover `2 * dim`, reduces mod
/// `dim`, then resolves collisions by assigning the smallest unused index.
/// The result is a permutation whose prefixes spread across the whole range
/// instead of clustering at the front.
pub fn low_discrepancy_order(dim: usize) -> Vec<usize> {
    let mut order = vec![0usize; dim];
    for (index, slot) in order.iter_mut().enumerate() {
        let mut reversed = 0usize;
        let mut remaining = index;
        let mut bit = 0u32;
        while (1u64 << bit) <= dim as u64 * 2 {
            reversed = (reversed << 1) | (remaining & 1);
            remaining >>= 1;
            bit += 1;
        }
        *slot = reversed % dim;
    }
    // De-duplicate into a permutation: first claim wins, collisions take the
    // smallest unused index.
    let mut used = vec![false; dim];
    for i in 0..dim {
        let mut mapped = order[i];
        if used[mapped] {
            mapped = 0;
            while used[mapped] {
                mapped += 1;
            }
            order[i] = mapped;
        }
        used[order[i]] = true;
    }
    order
}

/// Random-basis streaming encoder.
///
/// Each symbol becomes its seeded random hypervector, rotated by the
/// position of the update in the stream (mod dim), then majority-bundled.
pub struct RandomBasisEncoder {
    dim: usize,
    seed: u64,
    step: usize,
    bundler: BinaryBundler,
}

impl RandomBasisEncoder {
    /// Create an encoder for `dim`-bit vectors.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, seed: u64) -> Self {
        Self {
            dim,
            seed,
            step: 0,
            bundler: BinaryBundler::new(dim),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Clear the bundle and the position counter.
    pub fn reset(&mut self) {
        self.bundler.reset();
        self.step = 0;
    }

    /// Number of symbols accumulated since the last reset.
    #[inline]
    pub fn count(&self) -> u64 {
        self.bundler.count()
    }

    /// Accumulate one symbol.
    pub fn update(&mut self, symbol: u64) {
        let mut hv = BinaryHv::new(self.dim);
        generate_random_hv(self.seed, symbol, &mut hv);
        if self.step != 0 {
            let mut rotated = BinaryHv::new(self.dim);
            permute_rotate(&hv, self.step, &mut rotated);
            self.bundler.accumulate(&rotated);
        } else {
            self.bundler.accumulate(&hv);
        }
        self.step = (self.step + 1) % self.dim;
    }

    /// Write the majority bundle into `out`.
    pub fn finalize(&self, out: &mut BinaryHv) {
        self.bundler.finalize(out);
    }
}

/// Hash-based streaming encoder.
///
/// Each token sets `k` bit positions derived by double hashing, optionally
/// rotated by a role index, then majority-bundled across updates.
pub struct HashEncoder {
    dim: usize,
    k: usize,
    seed: u64,
    bundler: BinaryBundler,
}

impl HashEncoder {
    /// Create an encoder setting `k` bits per token.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, k: usize, seed: u64) -> Self {
        Self {
            dim,
            k,
            seed,
            bundler: BinaryBundler::new(dim),
        }
    }

    /// Encoder with the default hash count and seed.
    pub fn with_defaults(dim: usize) -> Self {
        Self::new(dim, DEFAULT_HASH_COUNT, DEFAULT_HASH_SEED)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Clear the bundle.
    pub fn reset(&mut self) {
        self.bundler.reset();
    }

    /// Number of tokens accumulated since the last reset.
    #[inline]
    pub fn count(&self) -> u64 {
        self.bundler.count()
    }

    /// Write the sparse token vector for `(token, role)` into `out`.
    ///
    /// # Panics
    /// Panics if `out.dim() != self.dim()`.
    pub fn encode_token(&self, token: &str, role: usize, out: &mut BinaryHv) {
        assert_eq!(out.dim(), self.dim, "encode_token: dimension mismatch");
        out.clear();
        let (h1, h2) = double_hash(token.as_bytes(), self.seed);
        for i in 0..self.k {
            let pos = (h1.wrapping_add((i as u64).wrapping_mul(h2)) % self.dim as u64) as usize;
            out.set_bit(pos, true);
        }
        if role != 0 {
            let mut rotated = BinaryHv::new(self.dim);
            permute_rotate(out, role, &mut rotated);
            *out = rotated;
        }
    }

    /// Encode and accumulate one token.
    pub fn update(&mut self, token: &str, role: usize) {
        let mut hv = BinaryHv::new(self.dim);
        self.encode_token(token, role, &mut hv);
        self.bundler.accumulate(&hv);
    }

    /// Write the majority bundle into `out`.
    pub fn finalize(&self, out: &mut BinaryHv) {
        self.bundler.finalize(out);
    }
}

/// Unary intensity streaming encoder.
///
/// An intensity `k` (clamped to the maximum) sets `k` bits walked through a
/// low-discrepancy order starting at a rolling phase, so successive updates
/// touch different regions of the vector.
pub struct UnaryIntensityEncoder {
    dim: usize,
    max_intensity: usize,
    order: Vec<usize>,
    phase: usize,
    bundler: BinaryBundler,
}

impl UnaryIntensityEncoder {
    /// Create an encoder accepting intensities up to `max_intensity`.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, max_intensity: usize) -> Self {
        Self {
            dim,
            max_intensity,
            order: low_discrepancy_order(dim),
            phase: 0,
            bundler: BinaryBundler::new(dim),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Clear the bundle and the phase.
    pub fn reset(&mut self) {
        self.bundler.reset();
        self.phase = 0;
    }

    /// Number of intensities accumulated since the last reset.
    #[inline]
    pub fn count(&self) -> u64 {
        self.bundler.count()
    }

    /// Accumulate one intensity sample.
    pub fn update(&mut self, intensity: usize) {
        let clamped = intensity.min(self.max_intensity);
        let mut hv = BinaryHv::new(self.dim);
        for i in 0..clamped.min(self.dim) {
            hv.set_bit(self.order[(self.phase + i) % self.dim], true);
        }
        self.bundler.accumulate(&hv);
        self.phase = (self.phase + clamped) % self.dim;
    }

    /// Write the majority bundle into `out`.
    pub fn finalize(&self, out: &mut BinaryHv) {
        self.bundler.finalize(out);
    }
}

/// Sequential n-gram streaming encoder.
///
/// Keeps a circular window of the last `window` symbols; once the window is
/// full, every update folds the rotated symbol vectors (offset `o` rotated
/// by `o`, newest first) with XOR into one n-gram vector and bundles it.
pub struct SequentialNGramEncoder {
    dim: usize,
    window: usize,
    seed: u64,
    history: Vec<u64>,
    head: usize,
    filled: usize,
    bundler: BinaryBundler,
}

impl SequentialNGramEncoder {
    /// Create an encoder over `window`-symbol n-grams.
    ///
    /// # Panics
    /// Panics if `dim == 0` or `window == 0`.
    pub fn new(dim: usize, window: usize, seed: u64) -> Self {
        assert!(window > 0, "SequentialNGramEncoder window must be > 0");
        Self {
            dim,
            window,
            seed,
            history: vec![0; window],
            head: 0,
            filled: 0,
            bundler: BinaryBundler::new(dim),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Clear the bundle and the history window.
    pub fn reset(&mut self) {
        self.bundler.reset();
        self.head = 0;
        self.filled = 0;
    }

    /// Number of complete n-grams accumulated since the last reset.
    #[inline]
    pub fn count(&self) -> u64 {
        self.bundler.count()
    }

    /// Push one symbol; accumulates an n-gram once the window has filled.
    pub fn update(&mut self, symbol: u64) {
        self.history[self.head] = symbol;
        self.head = (self.head + 1) % self.window;
        if self.filled < self.window {
            self.filled += 1;
            if self.filled < self.window {
                return; // window not yet full
            }
        }

        let mut aggregate = BinaryHv::new(self.dim);
        let mut first = true;
        for offset in 0..self.window {
            let idx = (self.head + self.window - 1 - offset) % self.window;
            let mut hv = BinaryHv::new(self.dim);
            generate_random_hv(self.seed, self.history[idx], &mut hv);
            if offset != 0 {
                let mut rotated = BinaryHv::new(self.dim);
                permute_rotate(&hv, offset, &mut rotated);
                hv = rotated;
            }
            if first {
                aggregate = hv;
                first = false;
            } else {
                let mut bound = BinaryHv::new(self.dim);
                bind(&aggregate, &hv, &mut bound);
                aggregate = bound;
            }
        }
        self.bundler.accumulate(&aggregate);
    }

    /// Write the majority bundle into `out`.
    pub fn finalize(&self, out: &mut BinaryHv) {
        self.bundler.finalize(out);
    }
}
