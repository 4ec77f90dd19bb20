//! SSE2 kernels: 128-bit lanes, two words per chunk.
//!
//! SSE2 is baseline on x86_64, so the safe wrappers dispatch directly into
//! the `#[target_feature]` bodies. Hamming reduces each 128-bit XOR by
//! extracting the two u64 lanes and using the hardware popcount; on large
//! dimensions this stays in the shadow of the load ports, which is why the
//! policy can prefer it over AVX2 past the dimension threshold.

use core::arch::x86_64::*;

/// XOR-bind two word buffers into `out` using 128-bit lanes.
#[inline]
pub fn bind_words(a: &[u64], b: &[u64], out: &mut [u64]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), out.len());
    // SSE2 is part of the x86_64 baseline.
    unsafe { bind_words_impl(a, b, out) }
}

/// Hamming distance over word buffers using 128-bit XOR + scalar popcount.
#[inline]
pub fn hamming_words(a: &[u64], b: &[u64]) -> usize {
    assert_eq!(a.len(), b.len());
    unsafe { hamming_words_impl(a, b) }
}

#[target_feature(enable = "sse2")]
unsafe fn bind_words_impl(a: &[u64], b: &[u64], out: &mut [u64]) {
    let word_count = a.len();
    let sse2_words = (word_count / 2) * 2;
    let mut i = 0;
    while i < sse2_words {
        let va = _mm_loadu_si128(a.as_ptr().add(i) as *const __m128i);
        let vb = _mm_loadu_si128(b.as_ptr().add(i) as *const __m128i);
        let vx = _mm_xor_si128(va, vb);
        _mm_storeu_si128(out.as_mut_ptr().add(i) as *mut __m128i, vx);
        i += 2;
    }
    // Scalar tail: at most one word.
    while i < word_count {
        out[i] = a[i] ^ b[i];
        i += 1;
    }
}

#[target_feature(enable = "sse2")]
unsafe fn hamming_words_impl(a: &[u64], b: &[u64]) -> usize {
    let word_count = a.len();
    let sse2_words = (word_count / 2) * 2;
    let mut total = 0usize;
    let mut i = 0;
    while i < sse2_words {
        let va = _mm_loadu_si128(a.as_ptr().add(i) as *const __m128i);
        let vb = _mm_loadu_si128(b.as_ptr().add(i) as *const __m128i);
        let vx = _mm_xor_si128(va, vb);
        let mut lanes = [0u64; 2];
        _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, vx);
        total += lanes[0].count_ones() as usize;
        total += lanes[1].count_ones() as usize;
        i += 2;
    }
    while i < word_count {
        total += (a[i] ^ b[i]).count_ones() as usize;
        i += 1;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::scalar;

    fn patterned(len: usize, salt: u64) -> Vec<u64> {
        (0..len)
            .map(|i| (i as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15) ^ salt)
            .collect()
    }

    #[test]
    fn matches_scalar_on_awkward_lengths() {
        for len in [0usize, 1, 2, 3, 4, 7, 8, 15, 16, 157] {
            let a = patterned(len, 0xAAAA);
            let b = patterned(len, 0x5555_5555);
            let mut out_simd = vec![0u64; len];
            let mut out_scalar = vec![0u64; len];
            bind_words(&a, &b, &mut out_simd);
            scalar::bind_words(&a, &b, &mut out_scalar);
            assert_eq!(out_simd, out_scalar, "bind mismatch at len {}", len);
            assert_eq!(
                hamming_words(&a, &b),
                scalar::hamming_words(&a, &b),
                "hamming mismatch at len {}",
                len
            );
        }
    }

    #[test]
    fn identical_inputs_have_zero_distance() {
        let a = patterned(33, 7);
        assert_eq!(hamming_words(&a, &a), 0);
    }
}
