use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::hash_address::Address;
use crate::params::XMSS_N as N;
use crate::utils::{ull_to_bytes, xor_into};

// SHA-256 has no keyed mode of its own; each of the four hash roles prepends
// an n-byte big-endian domain tag to its preimage.
const PADDING_F: u64 = 0;
const PADDING_H: u64 = 1;
const PADDING_HASH: u64 = 2;
const PADDING_PRF: u64 = 3;

fn padding(tag: u64) -> [u8; N] {
    let mut out = [0u8; N];
    ull_to_bytes(&mut out, tag);
    out
}

/// Computes PRF(key, m) for an n-byte key and a 32-byte input (a serialized
/// address or a counter).
pub(crate) fn prf(out: &mut [u8], key: &[u8], m: &[u8; 32]) {
    let mut buf = [0u8; 3 * N];
    buf[..N].copy_from_slice(&padding(PADDING_PRF));
    buf[N..2 * N].copy_from_slice(&key[..N]);
    buf[2 * N..].copy_from_slice(m);

    out[..N].copy_from_slice(&Sha256::digest(buf));
    buf.zeroize();
}

/// Keyed one-way function F for WOTS+ chains: a single n-byte input, keyed
/// and masked via PRF at the given address. The caller's address is not
/// mutated.
pub(crate) fn thash_f(out: &mut [u8], input: &[u8], pub_seed: &[u8], addr: &Address) {
    let mut addr = *addr;
    let mut buf = [0u8; 3 * N];
    let mut bitmask = [0u8; N];

    buf[..N].copy_from_slice(&padding(PADDING_F));

    addr.set_key_and_mask(0);
    prf(&mut buf[N..2 * N], pub_seed, &addr.to_bytes());

    addr.set_key_and_mask(1);
    prf(&mut bitmask, pub_seed, &addr.to_bytes());

    xor_into(&mut buf[2 * N..], input, &bitmask);

    out[..N].copy_from_slice(&Sha256::digest(buf));
    buf.zeroize();
}

/// Tree hash function H for internal nodes: a 2n-byte input, keyed via PRF
/// and masked with a 2n-byte bitmask. The caller's address is not mutated.
pub(crate) fn thash_h(out: &mut [u8], input: &[u8], pub_seed: &[u8], addr: &Address) {
    let mut addr = *addr;
    let mut buf = [0u8; 4 * N];
    let mut bitmask = [0u8; 2 * N];

    buf[..N].copy_from_slice(&padding(PADDING_H));

    addr.set_key_and_mask(0);
    prf(&mut buf[N..2 * N], pub_seed, &addr.to_bytes());

    addr.set_key_and_mask(1);
    prf(&mut bitmask[..N], pub_seed, &addr.to_bytes());

    addr.set_key_and_mask(2);
    prf(&mut bitmask[N..], pub_seed, &addr.to_bytes());

    xor_into(&mut buf[2 * N..], input, &bitmask);

    out[..N].copy_from_slice(&Sha256::digest(buf));
    buf.zeroize();
}

/// Computes the message hash H_msg over the randomizer R, the public root,
/// the leaf index and the message, streaming the message directly into
/// SHA-256.
pub(crate) fn h_msg(out: &mut [u8], r: &[u8], root: &[u8], idx: u64, msg: &[u8]) {
    let mut idx_bytes = [0u8; N];
    ull_to_bytes(&mut idx_bytes, idx);

    let mut hasher = Sha256::new();
    hasher.update(padding(PADDING_HASH));
    hasher.update(&r[..N]);
    hasher.update(&root[..N]);
    hasher.update(idx_bytes);
    hasher.update(msg);
    out[..N].copy_from_slice(&hasher.finalize());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_calls_leave_the_address_untouched() {
        let mut addr = Address::new();
        addr.set_tree_height(3);
        addr.set_tree_index(5);
        let snapshot = addr;

        let mut out = [0u8; N];
        thash_f(&mut out, &[0u8; N], &[0u8; N], &addr);
        thash_h(&mut out, &[0u8; 2 * N], &[0u8; N], &addr);
        assert_eq!(addr, snapshot);
    }

    #[test]
    fn key_and_mask_words_separate_the_derivations() {
        // F and H at the same address must differ: distinct domain tags and
        // distinct mask derivations.
        let addr = Address::new();
        let seed = [0x5au8; N];

        let mut f_out = [0u8; N];
        thash_f(&mut f_out, &[0u8; N], &seed, &addr);
        let mut h_out = [0u8; N];
        thash_h(&mut h_out, &[0u8; 2 * N], &seed, &addr);
        assert_ne!(f_out, h_out);
    }

    #[test]
    fn prf_distinguishes_key_and_input() {
        let mut a = [0u8; N];
        let mut b = [0u8; N];
        prf(&mut a, &[1u8; N], &[2u8; 32]);
        prf(&mut b, &[2u8; N], &[1u8; 32]);
        assert_ne!(a, b);
    }
}
