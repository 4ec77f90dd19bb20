//! Non-cryptographic token hashing.
//!
//! FNV-1a over token bytes with seed folding, plus the double-hash pair used
//! by the hash encoder to derive `k` bit positions per token. Deterministic
//! and platform-independent; never use these for security-sensitive hashing.

pub const FNV_OFFSET_BASIS_64: u64 = 1_469_598_103_934_665_603;
pub const FNV_PRIME_64: u64 = 1_099_511_628_211;

/// Salt folded into the seed for token-id derivation and the second hash of
/// the double-hash pair.
pub const TOKEN_SALT: u64 = 0x5bf0_3635_f0b7_a54d;

/// Seeded 64-bit FNV-1a.
#[inline]
pub fn fnv1a_64(token: &[u8], seed: u64) -> u64 {
    let mut hash = FNV_OFFSET_BASIS_64 ^ seed;
    for &byte in token {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME_64);
    }
    hash
}

/// Double hashing: `(h1, h2)` with `h2` forced odd so the probe sequence
/// `h1 + i * h2 (mod dim)` steps through distinct residues.
#[inline]
pub fn double_hash(token: &[u8], seed: u64) -> (u64, u64) {
    let h1 = fnv1a_64(token, seed);
    let h2 = fnv1a_64(token, seed ^ TOKEN_SALT);
    (h1, (h2 << 1) | 1)
}
