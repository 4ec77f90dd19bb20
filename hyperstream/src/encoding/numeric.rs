use hyperstream_core::BinaryHv;

use super::encoders::low_discrepancy_order;
use super::item_memory::ItemMemory;

/// Thermometer encoder for scalar values.
///
/// Maps `x` in `[min, max]` to `floor(clamp((x-min)/(max-min), 0, 1) * dim)`
/// set bits distributed through a low-discrepancy order, so nearby values
/// share most of their bits while staying spread across the vector. A
/// degenerate range (`max <= min`) encodes everything to the zero vector.
pub struct ThermometerEncoder {
    dim: usize,
    min: f64,
    max: f64,
    order: Vec<usize>,
}

impl ThermometerEncoder {
    /// Create an encoder for values in `[min, max]`.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, min: f64, max: f64) -> Self {
        assert!(dim > 0, "ThermometerEncoder dimension must be > 0");
        Self {
            dim,
            min,
            max,
            order: low_discrepancy_order(dim),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Encode `x` into `out`.
    ///
    /// # Panics
    /// Panics if `out.dim() != self.dim()`.
    pub fn encode(&self, x: f64, out: &mut BinaryHv) {
        assert_eq!(out.dim(), self.dim, "encode: dimension mismatch");
        out.clear();
        if self.max <= self.min {
            return; // degenerate range: zero vector
        }
        let p = ((x - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        let k = (p * self.dim as f64) as usize;
        for i in 0..k.min(self.dim) {
            out.set_bit(self.order[i], true);
        }
    }
}

/// Random projection encoder for dense float vectors.
///
/// Each input index derives a deterministic basis hypervector; the value
/// adds `+v` where the basis bit is set and `-v` where it is clear. The
/// strict `> 0` threshold makes empty and all-zero inputs encode to the
/// zero vector.
pub struct RandomProjectionEncoder {
    dim: usize,
    im: ItemMemory,
}

const PROJECTION_SEED_SALT: u64 = 0xa5a5_a5a5_a5a5_a5a5;

impl RandomProjectionEncoder {
    /// Create an encoder for `dim`-bit outputs.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, seed: u64) -> Self {
        Self {
            dim,
            im: ItemMemory::new(dim, seed ^ PROJECTION_SEED_SALT),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Project `values` into `out`.
    ///
    /// # Panics
    /// Panics if `out.dim() != self.dim()`.
    pub fn encode(&self, values: &[f32], out: &mut BinaryHv) {
        assert_eq!(out.dim(), self.dim, "encode: dimension mismatch");
        let mut acc = vec![0.0f32; self.dim];
        let mut basis = BinaryHv::new(self.dim);
        for (i, &v) in values.iter().enumerate() {
            if v == 0.0 {
                continue;
            }
            self.im.encode_id(i as u64, &mut basis);
            for (bit, slot) in acc.iter_mut().enumerate() {
                *slot += if basis.get_bit(bit) { v } else { -v };
            }
        }
        out.clear();
        for (bit, &a) in acc.iter().enumerate() {
            if a > 0.0 {
                out.set_bit(bit, true);
            }
        }
    }
}
