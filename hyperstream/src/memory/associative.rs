use hyperstream_core::ops::hamming_distance;
use hyperstream_core::BinaryHv;
use thiserror::Error;

/// Failure modes of the associative memories.
///
/// Every error leaves the store exactly as it was before the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("store is at capacity ({capacity})")]
    CapacityExhausted { capacity: usize },

    #[error("hypervector dimension {found} does not match store dimension {expected}")]
    DimMismatch { expected: usize, found: usize },

    #[error("destination store is not empty (size {len})")]
    NotEmpty { len: usize },

    #[error("raw buffer length {found} does not match expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

/// One learned prototype: a label and its hypervector.
#[derive(Clone, Debug)]
pub struct PrototypeEntry {
    pub label: u64,
    pub hv: BinaryHv,
}

/// Append-only prototype memory with nearest-neighbour classification.
///
/// Labels may repeat; classification returns the label of the entry with
/// the highest match `D - hamming`, first-stored entry winning ties.
pub struct PrototypeMemory {
    dim: usize,
    capacity: usize,
    entries: Vec<PrototypeEntry>,
}

impl PrototypeMemory {
    /// Create an empty store for `dim`-bit vectors holding up to
    /// `capacity` entries.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, capacity: usize) -> Self {
        assert!(dim > 0, "PrototypeMemory dimension must be > 0");
        Self {
            dim,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a labelled prototype.
    pub fn learn(&mut self, label: u64, hv: &BinaryHv) -> Result<(), MemoryError> {
        if hv.dim() != self.dim {
            return Err(MemoryError::DimMismatch {
                expected: self.dim,
                found: hv.dim(),
            });
        }
        if self.entries.len() >= self.capacity {
            return Err(MemoryError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        self.entries.push(PrototypeEntry {
            label,
            hv: hv.clone(),
        });
        Ok(())
    }

    /// Label of the stored entry nearest to `query` by Hamming distance,
    /// or `default_label` when the store is empty.
    pub fn classify(&self, query: &BinaryHv, default_label: u64) -> u64 {
        self.classify_with(query, hamming_distance, default_label)
    }

    /// Classification with a caller-provided distance function.
    pub fn classify_with<F>(&self, query: &BinaryHv, dist_fn: F, default_label: u64) -> u64
    where
        F: Fn(&BinaryHv, &BinaryHv) -> usize,
    {
        if self.entries.is_empty() {
            return default_label;
        }
        let mut best_index = 0usize;
        let mut best_match = 0usize;
        for (i, entry) in self.entries.iter().enumerate() {
            let dist = dist_fn(query, &entry.hv);
            let matched = self.dim - dist;
            if matched > best_match {
                best_match = matched;
                best_index = i;
            }
        }
        self.entries[best_index].label
    }

    /// Read-only view of the stored entries, for serialization and
    /// diagnostics.
    #[inline]
    pub fn entries(&self) -> &[PrototypeEntry] {
        &self.entries
    }
}

/// Read-only view over a cluster memory's parallel buffers.
///
/// `sums` is row-major: `dim` counters per cluster, `size` rows valid.
#[derive(Clone, Copy, Debug)]
pub struct ClusterView<'a> {
    pub labels: &'a [u64],
    pub counts: &'a [i32],
    pub sums: &'a [i32],
    pub size: usize,
}

/// Per-label additive counter bank with majority thresholding and decay.
///
/// Each cluster row holds one `i32` counter per bit; `update` votes ±1 per
/// bit and bumps the cluster's observation count. Label lookup is a linear
/// scan, which keeps the `labels` order stable for serialization.
pub struct ClusterMemory {
    dim: usize,
    capacity: usize,
    labels: Vec<u64>,
    counts: Vec<i32>,
    sums: Vec<i32>,
    size: usize,
}

impl ClusterMemory {
    /// Create an empty store for `dim`-bit vectors holding up to
    /// `capacity` clusters.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, capacity: usize) -> Self {
        assert!(dim > 0, "ClusterMemory dimension must be > 0");
        Self {
            dim,
            capacity,
            labels: vec![0; capacity],
            counts: vec![0; capacity],
            sums: vec![0; capacity * dim],
            size: 0,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn find_index(&self, label: u64) -> Option<usize> {
        self.labels[..self.size].iter().position(|&l| l == label)
    }

    /// Vote `hv` into the cluster for `label`, allocating a new cluster
    /// when the label is unseen and capacity remains.
    pub fn update(&mut self, label: u64, hv: &BinaryHv) -> Result<(), MemoryError> {
        if hv.dim() != self.dim {
            return Err(MemoryError::DimMismatch {
                expected: self.dim,
                found: hv.dim(),
            });
        }
        let index = match self.find_index(label) {
            Some(i) => i,
            None => {
                if self.size >= self.capacity {
                    return Err(MemoryError::CapacityExhausted {
                        capacity: self.capacity,
                    });
                }
                let i = self.size;
                self.labels[i] = label;
                self.counts[i] = 0;
                // The sums row is already zero (cleared at construction and
                // never dirtied: rows are only written for live clusters).
                self.size += 1;
                i
            }
        };
        let row = &mut self.sums[index * self.dim..(index + 1) * self.dim];
        for (bit, sum) in row.iter_mut().enumerate() {
            *sum += if hv.get_bit(bit) { 1 } else { -1 };
        }
        self.counts[index] += 1;
        Ok(())
    }

    /// Multiply every counter by `decay_factor`, truncating toward zero.
    ///
    /// Factors outside `[0, 1]` are ignored (no-op, not an error).
    pub fn apply_decay(&mut self, decay_factor: f32) {
        if !(0.0..=1.0).contains(&decay_factor) {
            return;
        }
        for i in 0..self.size {
            for sum in &mut self.sums[i * self.dim..(i + 1) * self.dim] {
                *sum = (*sum as f32 * decay_factor) as i32;
            }
            self.counts[i] = (self.counts[i] as f32 * decay_factor) as i32;
        }
    }

    /// Threshold the cluster for `label` into `out`: bit `b` is
    /// `sums[b] >= 0`. Unknown labels clear `out` and return.
    ///
    /// # Panics
    /// Panics if `out.dim() != self.dim()`.
    pub fn finalize(&self, label: u64, out: &mut BinaryHv) {
        assert_eq!(out.dim(), self.dim, "finalize: dimension mismatch");
        out.clear();
        let Some(index) = self.find_index(label) else {
            return;
        };
        let row = &self.sums[index * self.dim..(index + 1) * self.dim];
        for (bit, &sum) in row.iter().enumerate() {
            if sum >= 0 {
                out.set_bit(bit, true);
            }
        }
    }

    /// Read-only view over labels, counts, and sums; the first
    /// [`len`](Self::len) rows are valid.
    pub fn view(&self) -> ClusterView<'_> {
        ClusterView {
            labels: &self.labels[..self.size],
            counts: &self.counts[..self.size],
            sums: &self.sums[..self.size * self.dim],
            size: self.size,
        }
    }

    /// Load raw buffers into an empty store (serialization path).
    ///
    /// `labels` and `counts` carry one entry per cluster, `sums` one row of
    /// `dim` counters per cluster. Fails without side effects when the
    /// store is non-empty, the cluster count exceeds capacity, or the
    /// buffer lengths disagree.
    pub fn load_raw(
        &mut self,
        labels: &[u64],
        counts: &[i32],
        sums: &[i32],
    ) -> Result<(), MemoryError> {
        if self.size != 0 {
            return Err(MemoryError::NotEmpty { len: self.size });
        }
        let n = labels.len();
        if n > self.capacity {
            return Err(MemoryError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        if counts.len() != n {
            return Err(MemoryError::LengthMismatch {
                expected: n,
                found: counts.len(),
            });
        }
        if sums.len() != n * self.dim {
            return Err(MemoryError::LengthMismatch {
                expected: n * self.dim,
                found: sums.len(),
            });
        }
        self.labels[..n].copy_from_slice(labels);
        self.counts[..n].copy_from_slice(counts);
        self.sums[..n * self.dim].copy_from_slice(sums);
        self.size = n;
        Ok(())
    }
}

/// Cleanup dictionary: canonical vectors restored by nearest neighbour.
pub struct CleanupMemory {
    dim: usize,
    capacity: usize,
    entries: Vec<BinaryHv>,
}

impl CleanupMemory {
    /// Create an empty dictionary for `dim`-bit vectors holding up to
    /// `capacity` entries.
    ///
    /// # Panics
    /// Panics if `dim == 0`.
    pub fn new(dim: usize, capacity: usize) -> Self {
        assert!(dim > 0, "CleanupMemory dimension must be > 0");
        Self {
            dim,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a canonical vector.
    pub fn insert(&mut self, hv: &BinaryHv) -> Result<(), MemoryError> {
        if hv.dim() != self.dim {
            return Err(MemoryError::DimMismatch {
                expected: self.dim,
                found: hv.dim(),
            });
        }
        if self.entries.len() >= self.capacity {
            return Err(MemoryError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        self.entries.push(hv.clone());
        Ok(())
    }

    /// The stored vector nearest to `noisy`, or a clone of `fallback` when
    /// the dictionary is empty. Ties break to the earliest insertion.
    pub fn restore(&self, noisy: &BinaryHv, fallback: &BinaryHv) -> BinaryHv {
        if self.entries.is_empty() {
            return fallback.clone();
        }
        let mut best_index = 0usize;
        let mut best_match = 0usize;
        for (i, entry) in self.entries.iter().enumerate() {
            let dist = hamming_distance(noisy, entry);
            let matched = self.dim - dist;
            if matched > best_match {
                best_match = matched;
                best_index = i;
            }
        }
        self.entries[best_index].clone()
    }
}
