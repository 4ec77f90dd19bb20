//! NEON kernels for AArch64: 128-bit lanes, two words per chunk.
//!
//! Advanced SIMD is mandatory on AArch64, so no runtime gate is needed.
//! Hamming reduces each XOR lane with `vcntq_u8` byte popcounts summed by
//! `vaddvq_u8` (16 bytes max 128 set bits, so the u8 horizontal add cannot
//! overflow).

use core::arch::aarch64::*;

/// XOR-bind two word buffers into `out` using NEON lanes.
#[inline]
pub fn bind_words(a: &[u64], b: &[u64], out: &mut [u64]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), out.len());
    unsafe { bind_words_impl(a, b, out) }
}

/// Hamming distance over word buffers using NEON byte popcounts.
#[inline]
pub fn hamming_words(a: &[u64], b: &[u64]) -> usize {
    assert_eq!(a.len(), b.len());
    unsafe { hamming_words_impl(a, b) }
}

unsafe fn bind_words_impl(a: &[u64], b: &[u64], out: &mut [u64]) {
    let word_count = a.len();
    let neon_words = (word_count / 2) * 2;
    let mut i = 0;
    while i < neon_words {
        let va = vld1q_u64(a.as_ptr().add(i));
        let vb = vld1q_u64(b.as_ptr().add(i));
        let vx = veorq_u64(va, vb);
        vst1q_u64(out.as_mut_ptr().add(i), vx);
        i += 2;
    }
    while i < word_count {
        out[i] = a[i] ^ b[i];
        i += 1;
    }
}

unsafe fn hamming_words_impl(a: &[u64], b: &[u64]) -> usize {
    let word_count = a.len();
    let neon_words = (word_count / 2) * 2;
    let mut total = 0usize;
    let mut i = 0;
    while i < neon_words {
        let va = vld1q_u64(a.as_ptr().add(i));
        let vb = vld1q_u64(b.as_ptr().add(i));
        let vx = veorq_u64(va, vb);
        let bytes = vreinterpretq_u8_u64(vx);
        let pc = vcntq_u8(bytes);
        total += vaddvq_u8(pc) as usize;
        i += 2;
    }
    while i < word_count {
        total += (a[i] ^ b[i]).count_ones() as usize;
        i += 1;
    }
    total
}
