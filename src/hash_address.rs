pub(crate) const ADDR_TYPE_OTS: u32 = 0;
pub(crate) const ADDR_TYPE_LTREE: u32 = 1;
pub(crate) const ADDR_TYPE_HASHTREE: u32 = 2;

/// A 32-byte hash address: eight 32-bit words that domain-separate every
/// call to the keyed hash functions (RFC 8391 section 2.5).
///
/// Addresses are plain values. Deriving a child address copies the parent;
/// callers never observe mutation through a shared pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Address([u32; 8]);

impl Address {
    pub(crate) fn new() -> Self {
        Self([0u32; 8])
    }

    #[inline]
    pub(crate) fn set_layer_addr(&mut self, layer: u32) {
        self.0[0] = layer;
    }

    #[inline]
    pub(crate) fn set_tree_addr(&mut self, tree: u64) {
        self.0[1] = (tree >> 32) as u32;
        #[allow(clippy::cast_possible_truncation)]
        {
            self.0[2] = tree as u32;
        }
    }

    /// Sets the address type and clears the type-specific tail words.
    #[inline]
    pub(crate) fn set_type(&mut self, type_val: u32) {
        self.0[3] = type_val;
        self.0[4..].fill(0);
    }

    #[inline]
    pub(crate) fn set_key_and_mask(&mut self, key_and_mask: u32) {
        self.0[7] = key_and_mask;
    }

    /// Copies the layer and tree part of `other`; the remaining words are
    /// zeroed.
    #[inline]
    pub(crate) fn copy_subtree_addr(&mut self, other: &Address) {
        self.0[..3].copy_from_slice(&other.0[..3]);
        self.0[3..].fill(0);
    }

    #[inline]
    pub(crate) fn set_ots_addr(&mut self, ots: u32) {
        self.0[4] = ots;
    }

    #[inline]
    pub(crate) fn set_chain_addr(&mut self, chain: u32) {
        self.0[5] = chain;
    }

    #[inline]
    pub(crate) fn set_hash_addr(&mut self, hash: u32) {
        self.0[6] = hash;
    }

    #[inline]
    pub(crate) fn set_ltree_addr(&mut self, ltree: u32) {
        self.0[4] = ltree;
    }

    #[inline]
    pub(crate) fn set_tree_height(&mut self, tree_height: u32) {
        self.0[5] = tree_height;
    }

    #[inline]
    pub(crate) fn set_tree_index(&mut self, tree_index: u32) {
        self.0[6] = tree_index;
    }

    /// Serializes the eight words in big-endian byte order.
    pub(crate) fn to_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }
}
