//! Core operations over hypervectors: binding, bundling, permutation,
//! similarity.
//!
//! Representation ([`BinaryHv`]) is separate from the operations so the
//! word-level kernels can be swapped by the backend policy without touching
//! call sites. Bind and Hamming route through [`crate::backend::policy`];
//! everything else is scalar.

use crate::backend::policy;
use crate::hv::{BinaryHv, HvElement, TypedHv, WORD_BITS};

/// XOR binding. Involutive: `bind(bind(x, k), k) == x`.
///
/// # Panics
/// Panics if dimensions differ.
pub fn bind(a: &BinaryHv, b: &BinaryHv, out: &mut BinaryHv) {
    assert_eq!(a.dim(), b.dim(), "bind: dimension mismatch");
    assert_eq!(a.dim(), out.dim(), "bind: output dimension mismatch");
    policy::bind_words_auto(a.dim(), a.words(), b.words(), out.words_mut());
    // XOR of two tail-invariant inputs keeps the tail clear; no re-mask.
}

/// Element-wise product binding for typed hypervectors.
pub fn bind_typed<T: HvElement>(a: &TypedHv<T>, b: &TypedHv<T>, out: &mut TypedHv<T>) {
    assert_eq!(a.dim(), b.dim(), "bind_typed: dimension mismatch");
    assert_eq!(a.dim(), out.dim(), "bind_typed: output dimension mismatch");
    for i in 0..a.dim() {
        out[i] = a[i].mul(b[i]);
    }
}

/// Number of differing bits.
///
/// # Panics
/// Panics if dimensions differ.
pub fn hamming_distance(a: &BinaryHv, b: &BinaryHv) -> usize {
    assert_eq!(a.dim(), b.dim(), "hamming_distance: dimension mismatch");
    policy::hamming_words_auto(a.dim(), a.words(), b.words())
}

/// Hamming distance mapped to [-1, 1]: `1 - 2h/D`, clamped.
///
/// Exactly 1 iff the vectors are equal (tail bits are zero on both sides).
pub fn normalized_hamming_similarity(a: &BinaryHv, b: &BinaryHv) -> f32 {
    let h = hamming_distance(a, b);
    let sim = 1.0f32 - 2.0 * h as f32 / a.dim() as f32;
    sim.clamp(-1.0, 1.0)
}

/// Cosine similarity over typed hypervectors; conjugates the left operand
/// for complex elements. `eps = 1e-12` guards the zero-norm case.
pub fn cosine_similarity<T: HvElement>(a: &TypedHv<T>, b: &TypedHv<T>) -> f32 {
    assert_eq!(a.dim(), b.dim(), "cosine_similarity: dimension mismatch");
    let mut num = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for i in 0..a.dim() {
        num += a[i].inner_product_term(b[i]);
        na += a[i].squared_norm();
        nb += b[i].squared_norm();
    }
    let den = na.sqrt() * nb.sqrt() + 1e-12;
    (num / den) as f32
}

/// Left-rotate by `rotate_by` positions.
///
/// Word-wise rotation with bit carry across 64-bit words: the whole-word
/// part rotates indices, the intra-word part shifts with carry from the
/// neighbouring word, and the final word is re-masked to keep the tail
/// invariant.
pub fn permute_rotate(input: &BinaryHv, rotate_by: usize, output: &mut BinaryHv) {
    assert_eq!(
        input.dim(),
        output.dim(),
        "permute_rotate: dimension mismatch"
    );
    let word_count = input.word_count();
    let rotate_words = (rotate_by / WORD_BITS) % word_count;
    let rotate_bits = rotate_by % WORD_BITS;

    {
        let in_words = input.words();
        let out_words = output.words_mut();
        if rotate_bits == 0 {
            for i in 0..word_count {
                out_words[i] = in_words[(i + word_count - rotate_words) % word_count];
            }
        } else {
            let shift_right = WORD_BITS - rotate_bits;
            for i in 0..word_count {
                let low_index = (i + word_count - rotate_words) % word_count;
                let high_index = (i + word_count - rotate_words - 1) % word_count;
                out_words[i] =
                    (in_words[low_index] << rotate_bits) | (in_words[high_index] >> shift_right);
            }
        }
    }
    output.apply_tail_mask();
}

/// Index rotation for typed hypervectors: `out[i] = in[(i + D - k) % D]`.
pub fn permute_rotate_typed<T: HvElement>(
    input: &TypedHv<T>,
    rotate_by: usize,
    output: &mut TypedHv<T>,
) {
    assert_eq!(
        input.dim(),
        output.dim(),
        "permute_rotate_typed: dimension mismatch"
    );
    let dim = input.dim();
    let shift = rotate_by % dim;
    for i in 0..dim {
        output[i] = input[(i + dim - shift) % dim];
    }
}

/// Two-input majority bundling (equivalent to OR for binary vectors).
pub fn bundle_pair_majority(a: &BinaryHv, b: &BinaryHv, out: &mut BinaryHv) {
    assert_eq!(a.dim(), b.dim(), "bundle_pair_majority: dimension mismatch");
    assert_eq!(
        a.dim(),
        out.dim(),
        "bundle_pair_majority: output dimension mismatch"
    );
    let aw = a.words();
    let bw = b.words();
    let ow = out.words_mut();
    for i in 0..aw.len() {
        ow[i] = aw[i] | bw[i];
    }
}

/// Element-wise additive bundling for typed hypervectors.
pub fn bundle_add<T: HvElement>(a: &TypedHv<T>, b: &TypedHv<T>, out: &mut TypedHv<T>) {
    assert_eq!(a.dim(), b.dim(), "bundle_add: dimension mismatch");
    assert_eq!(a.dim(), out.dim(), "bundle_add: output dimension mismatch");
    for i in 0..a.dim() {
        out[i] = a[i].add(b[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hv::Complex32;
    use crate::rng::generate_random_hv;

    fn hv_with_bits(dim: usize, bits: &[usize]) -> BinaryHv {
        let mut hv = BinaryHv::new(dim);
        for &b in bits {
            hv.set_bit(b, true);
        }
        hv
    }

    #[test]
    fn bind_scenario_a() {
        // D = 64; a = {0, 2}, b = {2, 3}; bind = {0, 3}; hamming = 2.
        let a = hv_with_bits(64, &[0, 2]);
        let b = hv_with_bits(64, &[2, 3]);
        let mut out = BinaryHv::new(64);
        bind(&a, &b, &mut out);
        assert_eq!(out, hv_with_bits(64, &[0, 3]));
        assert_eq!(hamming_distance(&a, &b), 2);
    }

    #[test]
    fn bind_involution() {
        let mut x = BinaryHv::new(1000);
        let mut k = BinaryHv::new(1000);
        generate_random_hv(1, 10, &mut x);
        generate_random_hv(2, 20, &mut k);
        let mut bound = BinaryHv::new(1000);
        let mut recovered = BinaryHv::new(1000);
        bind(&x, &k, &mut bound);
        bind(&bound, &k, &mut recovered);
        assert_eq!(recovered, x);
    }

    #[test]
    fn bind_commutative_associative() {
        let dims = 257;
        let mut x = BinaryHv::new(dims);
        let mut y = BinaryHv::new(dims);
        let mut z = BinaryHv::new(dims);
        generate_random_hv(7, 1, &mut x);
        generate_random_hv(7, 2, &mut y);
        generate_random_hv(7, 3, &mut z);

        let mut xy = BinaryHv::new(dims);
        let mut yx = BinaryHv::new(dims);
        bind(&x, &y, &mut xy);
        bind(&y, &x, &mut yx);
        assert_eq!(xy, yx);

        let mut xy_z = BinaryHv::new(dims);
        let mut yz = BinaryHv::new(dims);
        let mut x_yz = BinaryHv::new(dims);
        bind(&xy, &z, &mut xy_z);
        bind(&y, &z, &mut yz);
        bind(&x, &yz, &mut x_yz);
        assert_eq!(xy_z, x_yz);
    }

    #[test]
    fn hamming_symmetry_and_triangle() {
        let dims = 320;
        let mut x = BinaryHv::new(dims);
        let mut y = BinaryHv::new(dims);
        let mut z = BinaryHv::new(dims);
        generate_random_hv(11, 1, &mut x);
        generate_random_hv(11, 2, &mut y);
        generate_random_hv(11, 3, &mut z);

        assert_eq!(hamming_distance(&x, &x), 0);
        assert_eq!(hamming_distance(&x, &y), hamming_distance(&y, &x));
        let xz = hamming_distance(&x, &z);
        let xy = hamming_distance(&x, &y);
        let yz = hamming_distance(&y, &z);
        assert!(xz <= xy + yz);
    }

    #[test]
    fn normalized_similarity_bounds() {
        let dims = 128;
        let zero = BinaryHv::new(dims);
        let mut ones = BinaryHv::new(dims);
        for i in 0..dims {
            ones.set_bit(i, true);
        }
        assert_eq!(normalized_hamming_similarity(&zero, &zero), 1.0);
        assert_eq!(normalized_hamming_similarity(&zero, &ones), -1.0);

        let mut x = BinaryHv::new(dims);
        generate_random_hv(5, 5, &mut x);
        let s = normalized_hamming_similarity(&zero, &x);
        assert!((-1.0..=1.0).contains(&s));
        assert!(s < 1.0, "similarity 1 only for equal vectors");
    }

    #[test]
    fn rotate_scenario_b() {
        // D = 32; in = {0}; rotate 5 -> {5}.
        let input = hv_with_bits(32, &[0]);
        let mut out = BinaryHv::new(32);
        permute_rotate(&input, 5, &mut out);
        assert_eq!(out, hv_with_bits(32, &[5]));
    }

    #[test]
    fn rotate_zero_is_identity() {
        for dim in [32usize, 64, 100, 128] {
            let mut x = BinaryHv::new(dim);
            generate_random_hv(3, dim as u64, &mut x);
            let mut out = BinaryHv::new(dim);
            permute_rotate(&x, 0, &mut out);
            assert_eq!(out, x, "rotate(x, 0) at dim {}", dim);
        }
    }

    #[test]
    fn rotate_full_cycle_identity_word_aligned() {
        for dim in [64usize, 128, 256] {
            let mut x = BinaryHv::new(dim);
            generate_random_hv(17, dim as u64, &mut x);
            let mut out = BinaryHv::new(dim);
            permute_rotate(&x, dim, &mut out);
            assert_eq!(out, x, "rotate(x, D) at dim {}", dim);
        }
    }

    #[test]
    fn rotate_composes_additively_word_aligned() {
        let dim = 192;
        let mut x = BinaryHv::new(dim);
        generate_random_hv(23, 9, &mut x);
        for (a, b) in [(3usize, 7usize), (64, 65), (100, 150), (191, 1)] {
            let mut r1 = BinaryHv::new(dim);
            let mut r2 = BinaryHv::new(dim);
            let mut direct = BinaryHv::new(dim);
            permute_rotate(&x, a, &mut r1);
            permute_rotate(&r1, b, &mut r2);
            permute_rotate(&x, (a + b) % dim, &mut direct);
            assert_eq!(r2, direct, "rotate composition a={} b={}", a, b);
        }
    }

    #[test]
    fn rotate_carries_across_words() {
        // Bit 63 rotated by 1 lands on bit 64.
        let input = hv_with_bits(128, &[63]);
        let mut out = BinaryHv::new(128);
        permute_rotate(&input, 1, &mut out);
        assert_eq!(out, hv_with_bits(128, &[64]));
    }

    #[test]
    fn rotate_masks_tail() {
        let dim = 100;
        let mut x = BinaryHv::new(dim);
        generate_random_hv(31, 4, &mut x);
        let mut out = BinaryHv::new(dim);
        permute_rotate(&x, 37, &mut out);
        assert_eq!(out.words()[1] >> 36, 0, "tail bits must stay clear");
    }

    #[test]
    fn pair_majority_is_or() {
        let a = hv_with_bits(64, &[0, 1]);
        let b = hv_with_bits(64, &[1, 2]);
        let mut out = BinaryHv::new(64);
        bundle_pair_majority(&a, &b, &mut out);
        assert_eq!(out, hv_with_bits(64, &[0, 1, 2]));
    }

    #[test]
    fn typed_bind_and_bundle() {
        let a = TypedHv::from_vec(vec![1.0f32, 2.0, 3.0]);
        let b = TypedHv::from_vec(vec![4.0f32, 5.0, 6.0]);
        let mut prod = TypedHv::<f32>::new(3);
        let mut sum = TypedHv::<f32>::new(3);
        bind_typed(&a, &b, &mut prod);
        bundle_add(&a, &b, &mut sum);
        assert_eq!(prod.as_slice(), &[4.0, 10.0, 18.0]);
        assert_eq!(sum.as_slice(), &[5.0, 7.0, 9.0]);
    }

    #[test]
    fn typed_rotate() {
        let a = TypedHv::from_vec(vec![1.0f64, 2.0, 3.0, 4.0]);
        let mut out = TypedHv::<f64>::new(4);
        permute_rotate_typed(&a, 1, &mut out);
        assert_eq!(out.as_slice(), &[4.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn cosine_parallel_and_orthogonal() {
        let a = TypedHv::from_vec(vec![1.0f32, 0.0]);
        let b = TypedHv::from_vec(vec![2.0f32, 0.0]);
        let c = TypedHv::from_vec(vec![0.0f32, 3.0]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &c).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_vector_is_zero_not_nan() {
        let zero = TypedHv::<f32>::new(4);
        let a = TypedHv::from_vec(vec![1.0f32, 1.0, 1.0, 1.0]);
        let s = cosine_similarity(&zero, &a);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn cosine_complex_conjugates() {
        let i = Complex32::new(0.0, 1.0);
        let a = TypedHv::from_vec(vec![i; 4]);
        // cos(a, a) = Re(conj(i)*i) / |i||i| = 1.
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn dimension_mismatch_panics() {
        let a = BinaryHv::new(64);
        let b = BinaryHv::new(128);
        let _ = hamming_distance(&a, &b);
    }
}
