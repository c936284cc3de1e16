/// Encodes `val` into `out` as a big-endian integer. Encodings wider than
/// eight bytes are zero-padded on the left; narrower ones keep the low
/// bytes of the value.
pub(crate) fn ull_to_bytes(out: &mut [u8], val: u64) {
    let be = val.to_be_bytes();
    out.fill(0);
    if let Some(pad) = out.len().checked_sub(be.len()) {
        out[pad..].copy_from_slice(&be);
    } else {
        out.copy_from_slice(&be[be.len() - out.len()..]);
    }
}

/// Decodes a big-endian integer from `input`. Only the first eight bytes
/// contribute; anything past them is ignored.
pub(crate) fn bytes_to_ull(input: &[u8]) -> u64 {
    input
        .iter()
        .take(8)
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

/// XORs `a` and `b` componentwise into `out`, over the shortest length.
pub(crate) fn xor_into(out: &mut [u8], a: &[u8], b: &[u8]) {
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x ^ y;
    }
}
