//! Batch Hamming scans over packed vector databases.
//!
//! A database here is one contiguous word buffer holding `rows` vectors of
//! the same dimension back to back, the layout the associative memories and
//! the serialization format already use. Scans go through the same
//! dispatched word kernels as single-pair operations, so backend equivalence
//! carries over row by row.

use crate::backend::policy;
use crate::hv::{word_count_for, BinaryHv};

/// Hamming distance from `query` to every row of a packed database.
///
/// `database` holds `rows` vectors of `query.dim()` bits each, packed as
/// `word_count` words per row.
///
/// # Panics
/// Panics if `database.len() != rows * word_count_for(query.dim())`.
pub fn hamming_batch(query: &BinaryHv, database: &[u64], rows: usize) -> Vec<usize> {
    let word_count = word_count_for(query.dim());
    assert_eq!(
        database.len(),
        rows * word_count,
        "database length {} does not match {} rows of {} words",
        database.len(),
        rows,
        word_count
    );
    // Resolve the kernel once for the whole scan.
    let kernel = policy::select_hamming(query.dim(), crate::backend::cpu_feature_mask());
    let mut distances = Vec::with_capacity(rows);
    for row in 0..rows {
        let entry = &database[row * word_count..(row + 1) * word_count];
        distances.push(kernel(query.words(), entry));
    }
    distances
}

/// Indices and distances of the `k` database rows nearest to `query`,
/// sorted by ascending distance with index order breaking ties.
///
/// Uses a partial selection, so the cost past the scan is O(rows) rather
/// than a full sort.
pub fn hamming_top_k(
    query: &BinaryHv,
    database: &[u64],
    rows: usize,
    k: usize,
) -> (Vec<usize>, Vec<usize>) {
    let distances = hamming_batch(query, database, rows);
    let k = k.min(rows);
    if k == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut indices: Vec<usize> = (0..rows).collect();
    indices.select_nth_unstable_by_key(k - 1, |&i| (distances[i], i));
    indices.truncate(k);
    indices.sort_unstable_by_key(|&i| (distances[i], i));

    let top_distances = indices.iter().map(|&i| distances[i]).collect();
    (indices, top_distances)
}
