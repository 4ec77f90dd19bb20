use hyperstream_core::ops::permute_rotate;
use hyperstream_core::BinaryHv;

use super::item_memory::ItemMemory;

/// Symbol encoder: an [`ItemMemory`] with optional role-based rotation.
///
/// Rotating a token's vector by its role index keeps fillers for different
/// roles dissimilar while preserving each token's identity. Stateless after
/// construction.
pub struct SymbolEncoder {
    im: ItemMemory,
}

impl SymbolEncoder {
    /// Create a symbol encoder for `dim`-bit vectors.
    pub fn new(dim: usize, seed: u64) -> Self {
        Self {
            im: ItemMemory::new(dim, seed),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.im.dim()
    }

    /// Encode a token without a role.
    pub fn encode_token(&self, token: &str, out: &mut BinaryHv) {
        self.im.encode_token(token, out);
    }

    /// Encode a 64-bit id.
    pub fn encode_id(&self, id: u64, out: &mut BinaryHv) {
        self.im.encode_id(id, out);
    }

    /// Encode a token rotated left by `role` positions (`role == 0` is the
    /// plain token vector).
    pub fn encode_token_role(&self, token: &str, role: usize, out: &mut BinaryHv) {
        if role == 0 {
            self.im.encode_token(token, out);
            return;
        }
        let mut base = BinaryHv::new(self.im.dim());
        self.im.encode_token(token, &mut base);
        permute_rotate(&base, role, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_zero_matches_plain_token() {
        let enc = SymbolEncoder::new(128, 11);
        let mut plain = BinaryHv::new(128);
        let mut role0 = BinaryHv::new(128);
        enc.encode_token("alpha", &mut plain);
        enc.encode_token_role("alpha", 0, &mut role0);
        assert_eq!(plain, role0);
    }

    #[test]
    fn role_rotates_the_token_vector() {
        let enc = SymbolEncoder::new(128, 11);
        let mut plain = BinaryHv::new(128);
        let mut role3 = BinaryHv::new(128);
        let mut expected = BinaryHv::new(128);
        enc.encode_token("alpha", &mut plain);
        enc.encode_token_role("alpha", 3, &mut role3);
        permute_rotate(&plain, 3, &mut expected);
        assert_eq!(role3, expected);
        assert_ne!(role3, plain);
    }

    #[test]
    fn id_and_token_paths_are_independent() {
        let enc = SymbolEncoder::new(64, 5);
        let mut by_id = BinaryHv::new(64);
        let mut by_token = BinaryHv::new(64);
        enc.encode_id(42, &mut by_id);
        enc.encode_token("42", &mut by_token);
        assert_ne!(by_id, by_token);
    }
}
