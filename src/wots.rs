use crate::hash::{prf, thash_f};
use crate::hash_address::Address;
use crate::params::{XMSS_N, XmssParams};
use crate::utils::ull_to_bytes;

/// Expands an n-byte seed into a wots_len*n byte private key. Chunk `i` is
/// PRF(seed, toByte(i, 32)); the counter is always encoded in 32 bytes
/// regardless of n.
pub(crate) fn expand_seed(params: &XmssParams, out: &mut [u8], seed: &[u8]) {
    let n = params.n;
    let mut ctr = [0u8; 32];
    for (i, chunk) in out.chunks_exact_mut(n).take(params.wots_len).enumerate() {
        ull_to_bytes(&mut ctr, i as u64);
        prf(chunk, seed, &ctr);
    }
}

/// Chaining function (RFC 8391 Algorithm 2): interprets `input` as the
/// start-th value of its chain and applies F for `steps` rounds. Callers
/// keep start + steps <= w - 1.
fn gen_chain(
    params: &XmssParams,
    out: &mut [u8],
    input: &[u8],
    start: u32,
    steps: u32,
    pub_seed: &[u8],
    addr: &mut Address,
) {
    let n = params.n;
    out[..n].copy_from_slice(&input[..n]);

    let mut i = start;
    while i < start + steps && i < params.wots_w {
        addr.set_hash_addr(i);
        let mut tmp = [0u8; XMSS_N];
        tmp.copy_from_slice(&out[..n]);
        thash_f(out, &tmp, pub_seed, addr);
        i += 1;
    }
}

/// base_w (RFC 8391 Algorithm 1): interprets an array of bytes as integers
/// in base w, high digits first within each byte.
fn base_w(params: &XmssParams, output: &mut [u32], input: &[u8]) {
    let mut in_idx = 0;
    let mut total: u8 = 0;
    let mut bits: u32 = 0;
    // wots_w is a power of 2 <= 256, so (wots_w - 1) fits in u8.
    #[allow(clippy::cast_possible_truncation)]
    let mask = (params.wots_w - 1) as u8;

    for out_val in output.iter_mut() {
        if bits == 0 {
            total = input[in_idx];
            in_idx += 1;
            bits += 8;
        }
        bits -= params.wots_log_w;
        *out_val = u32::from((total >> bits) & mask);
    }
}

/// Computes the WOTS+ checksum over a message already in base w.
fn wots_checksum(params: &XmssParams, csum_base_w: &mut [u32], msg_base_w: &[u32]) {
    let mut csum: u32 = 0;
    for val in msg_base_w {
        csum += params.wots_w - 1 - val;
    }

    // Left-align the checksum so its digits line up on the byte boundary of
    // the base_w conversion.
    let csum_bits = params.wots_len2 * params.wots_log_w as usize;
    let csum_bytes_len = csum_bits.div_ceil(8);
    #[allow(clippy::cast_possible_truncation)]
    {
        csum <<= (8 * csum_bytes_len - csum_bits) as u32;
    }

    let mut csum_bytes = vec![0u8; csum_bytes_len];
    ull_to_bytes(&mut csum_bytes, u64::from(csum));
    base_w(params, csum_base_w, &csum_bytes);
}

/// Takes an n-byte message digest and derives the matching chain lengths:
/// len1 base-w digits of the digest followed by len2 checksum digits.
fn chain_lengths(params: &XmssParams, lengths: &mut [u32], msg: &[u8]) {
    let (msg_part, csum_part) = lengths.split_at_mut(params.wots_len1);
    base_w(params, msg_part, msg);
    wots_checksum(params, csum_part, msg_part);
}

/// Computes the WOTS+ public key from an expanded private key
/// (RFC 8391 Algorithm 4): every chain is walked to its end.
pub(crate) fn wots_pkgen(
    params: &XmssParams,
    pk: &mut [u8],
    sk: &[u8],
    pub_seed: &[u8],
    addr: &Address,
) {
    let n = params.n;
    let mut addr = *addr;
    for i in 0..params.wots_len {
        #[allow(clippy::cast_possible_truncation)]
        addr.set_chain_addr(i as u32);
        gen_chain(
            params,
            &mut pk[i * n..(i + 1) * n],
            &sk[i * n..(i + 1) * n],
            0,
            params.wots_w - 1,
            pub_seed,
            &mut addr,
        );
    }
}

/// Signs an n-byte message digest with an expanded private key
/// (RFC 8391 Algorithm 5).
pub(crate) fn wots_sign(
    params: &XmssParams,
    sig: &mut [u8],
    sk: &[u8],
    msg: &[u8],
    pub_seed: &[u8],
    addr: &Address,
) {
    let n = params.n;
    let mut lengths = vec![0u32; params.wots_len];
    chain_lengths(params, &mut lengths, msg);

    let mut addr = *addr;
    for i in 0..params.wots_len {
        #[allow(clippy::cast_possible_truncation)]
        addr.set_chain_addr(i as u32);
        gen_chain(
            params,
            &mut sig[i * n..(i + 1) * n],
            &sk[i * n..(i + 1) * n],
            0,
            lengths[i],
            pub_seed,
            &mut addr,
        );
    }
}

/// Recovers a WOTS+ public key from a signature and the signed digest
/// (RFC 8391 Algorithm 6): every chain is walked the remaining distance.
pub(crate) fn wots_pk_from_sig(
    params: &XmssParams,
    pk: &mut [u8],
    sig: &[u8],
    msg: &[u8],
    pub_seed: &[u8],
    addr: &Address,
) {
    let n = params.n;
    let mut lengths = vec![0u32; params.wots_len];
    chain_lengths(params, &mut lengths, msg);

    let mut addr = *addr;
    for i in 0..params.wots_len {
        #[allow(clippy::cast_possible_truncation)]
        addr.set_chain_addr(i as u32);
        gen_chain(
            params,
            &mut pk[i * n..(i + 1) * n],
            &sig[i * n..(i + 1) * n],
            lengths[i],
            params.wots_w - 1 - lengths[i],
            pub_seed,
            &mut addr,
        );
    }
}
