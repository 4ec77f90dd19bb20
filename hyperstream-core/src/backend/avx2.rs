//! AVX2 kernels: 256-bit lanes, four words per chunk.
//!
//! Popcount uses the SSSE3 nibble-lookup shuffle reduced through
//! `_mm256_sad_epu8` into four u64 lanes. Only the total is part of the
//! contract; the intermediate vector layout may differ from other backends.
//!
//! The safe wrappers must only be reached when the policy has seen AVX2 in
//! the feature mask; they debug-assert the host capability.

use core::arch::x86_64::*;

/// XOR-bind two word buffers into `out` using 256-bit lanes.
#[inline]
pub fn bind_words(a: &[u64], b: &[u64], out: &mut [u64]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), out.len());
    debug_assert!(is_x86_feature_detected!("avx2"));
    unsafe { bind_words_impl(a, b, out) }
}

/// Hamming distance over word buffers using 256-bit XOR + nibble popcount.
#[inline]
pub fn hamming_words(a: &[u64], b: &[u64]) -> usize {
    assert_eq!(a.len(), b.len());
    debug_assert!(is_x86_feature_detected!("avx2"));
    unsafe { hamming_words_impl(a, b) }
}

#[target_feature(enable = "avx2")]
unsafe fn bind_words_impl(a: &[u64], b: &[u64], out: &mut [u64]) {
    let word_count = a.len();
    let avx2_words = (word_count / 4) * 4;
    let mut i = 0;
    while i < avx2_words {
        let va = _mm256_loadu_si256(a.as_ptr().add(i) as *const __m256i);
        let vb = _mm256_loadu_si256(b.as_ptr().add(i) as *const __m256i);
        let vx = _mm256_xor_si256(va, vb);
        _mm256_storeu_si256(out.as_mut_ptr().add(i) as *mut __m256i, vx);
        i += 4;
    }
    while i < word_count {
        out[i] = a[i] ^ b[i];
        i += 1;
    }
}

/// Byte-nibble popcount of a 256-bit vector, reduced to a single total.
#[target_feature(enable = "avx2")]
unsafe fn popcount256(v: __m256i) -> u64 {
    // Per-byte popcount via two 16-entry nibble lookups.
    let lookup = _mm256_setr_epi8(
        0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4, //
        0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4,
    );
    let low_mask = _mm256_set1_epi8(0x0f);

    let lo = _mm256_and_si256(v, low_mask);
    let hi = _mm256_and_si256(_mm256_srli_epi16::<4>(v), low_mask);
    let popcnt_lo = _mm256_shuffle_epi8(lookup, lo);
    let popcnt_hi = _mm256_shuffle_epi8(lookup, hi);
    let sum = _mm256_add_epi8(popcnt_lo, popcnt_hi);

    // SAD against zero collapses each 8-byte group into a u64 lane.
    let sad = _mm256_sad_epu8(sum, _mm256_setzero_si256());
    let mut lanes = [0u64; 4];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, sad);
    lanes[0] + lanes[1] + lanes[2] + lanes[3]
}

#[target_feature(enable = "avx2")]
unsafe fn hamming_words_impl(a: &[u64], b: &[u64]) -> usize {
    let word_count = a.len();
    let avx2_words = (word_count / 4) * 4;
    let mut total = 0u64;
    let mut i = 0;
    while i < avx2_words {
        let va = _mm256_loadu_si256(a.as_ptr().add(i) as *const __m256i);
        let vb = _mm256_loadu_si256(b.as_ptr().add(i) as *const __m256i);
        let vx = _mm256_xor_si256(va, vb);
        total += popcount256(vx);
        i += 4;
    }
    while i < word_count {
        total += (a[i] ^ b[i]).count_ones() as u64;
        i += 1;
    }
    total as usize
}
