use rand::TryCryptoRng;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Error, XmssResult};
use crate::hash::{h_msg, prf};
use crate::hash_address::{ADDR_TYPE_HASHTREE, ADDR_TYPE_LTREE, ADDR_TYPE_OTS, Address};
use crate::params::{XMSS_N, XmssParams};
use crate::tree::{compute_root, get_seed, l_tree, treehash};
use crate::utils::{bytes_to_ull, ull_to_bytes};
use crate::wots::{expand_seed, wots_pk_from_sig, wots_sign};

/// Derives a key pair from a 3n-byte seed (prvSeed || prfSeed || pubSeed).
///
/// Format sk: `[idx(4) || prvSeed(n) || prfSeed(n) || pubSeed(n) || root(n)]`.
/// Format pk: `[root(n) || pubSeed(n)]`, no OID prefix.
pub(crate) fn xmss_seed_keypair(params: &XmssParams, pk: &mut [u8], sk: &mut [u8], seed: &[u8]) {
    let n = params.n;
    let ib = params.index_bytes;
    debug_assert_eq!(sk.len(), params.sk_bytes);
    debug_assert_eq!(pk.len(), params.pk_bytes);

    // The auth path is not needed for key generation, but one treehash
    // routine computes both root and path.
    let mut auth_path = vec![0u8; params.tree_height as usize * n];
    let mut top_tree_addr = Address::new();
    top_tree_addr.set_layer_addr(0);

    sk[..ib].fill(0);
    sk[ib..ib + 3 * n].copy_from_slice(&seed[..3 * n]);
    pk[n..2 * n].copy_from_slice(&sk[ib + 2 * n..ib + 3 * n]);

    // treehash reads the seeds while pk is mutably borrowed for the root.
    let mut prv_seed = sk[ib..ib + n].to_vec();
    let pub_seed = pk[n..2 * n].to_vec();
    treehash(
        params,
        &mut pk[..n],
        &mut auth_path,
        &prv_seed,
        &pub_seed,
        0,
        &top_tree_addr,
    );
    sk[ib + 3 * n..ib + 4 * n].copy_from_slice(&pk[..n]);
    prv_seed.zeroize();
}

/// Generates a key pair, drawing the three seeds from the host RNG.
pub(crate) fn xmss_keypair<R: TryCryptoRng + ?Sized>(
    params: &XmssParams,
    pk: &mut [u8],
    sk: &mut [u8],
    rng: &mut R,
) -> XmssResult<()> {
    let mut seed = vec![0u8; params.seed_len()];
    rng.try_fill_bytes(&mut seed)
        .map_err(|_| Error::EntropyFailure)?;
    xmss_seed_keypair(params, pk, sk, &seed);
    seed.zeroize();
    Ok(())
}

/// Signs a message, producing a detached signature and advancing the index
/// in `sk`.
///
/// The index advance happens before any signature bytes are returned; the
/// caller must persist the updated `sk` before releasing the signature, as
/// two signatures at one index forfeit all security.
pub(crate) fn xmss_sign(params: &XmssParams, sk: &mut [u8], m: &[u8]) -> XmssResult<Vec<u8>> {
    let n = params.n;
    let ib = params.index_bytes;
    debug_assert_eq!(sk.len(), params.sk_bytes);

    // Refuse before touching anything: idx == 2^h is the terminal state.
    let idx = bytes_to_ull(&sk[..ib]);
    if idx >= params.num_leaves() {
        return Err(Error::KeyExhausted);
    }

    let mut prv_seed = sk[ib..ib + n].to_vec();
    let mut prf_seed = sk[ib + n..ib + 2 * n].to_vec();
    let pub_seed = sk[ib + 2 * n..ib + 3 * n].to_vec();
    let pub_root = sk[ib + 3 * n..ib + 4 * n].to_vec();

    let mut sig = vec![0u8; params.sig_bytes];
    sig[..ib].copy_from_slice(&sk[..ib]);

    // Advance the index in sk before any signature bytes leave this
    // function.
    ull_to_bytes(&mut sk[..ib], idx + 1);

    // Digest randomization value R = PRF(prfSeed, toByte(idx, 32)).
    let mut idx_ctr = [0u8; 32];
    ull_to_bytes(&mut idx_ctr, idx);
    prf(&mut sig[ib..ib + n], &prf_seed, &idx_ctr);

    let mut mhash = [0u8; XMSS_N];
    h_msg(&mut mhash, &sig[ib..ib + n], &pub_root, idx, m);

    // Single tree: the low h bits select the leaf, the remaining bits
    // address the (only) tree.
    #[allow(clippy::cast_possible_truncation)]
    let idx_leaf = (idx & (params.num_leaves() - 1)) as u32;
    let idx_tree = idx >> params.tree_height;

    let mut ots_addr = Address::new();
    ots_addr.set_layer_addr(0);
    ots_addr.set_tree_addr(idx_tree);
    ots_addr.set_type(ADDR_TYPE_OTS);
    ots_addr.set_ots_addr(idx_leaf);

    let mut ots_seed = [0u8; XMSS_N];
    get_seed(&mut ots_seed, &prv_seed, &ots_addr);
    let mut wots_sk = vec![0u8; params.wots_sig_bytes];
    expand_seed(params, &mut wots_sk, &ots_seed);

    let wots_start = ib + n;
    let auth_start = wots_start + params.wots_sig_bytes;
    wots_sign(
        params,
        &mut sig[wots_start..auth_start],
        &wots_sk,
        &mhash,
        &pub_seed,
        &ots_addr,
    );

    let mut root = [0u8; XMSS_N];
    treehash(
        params,
        &mut root,
        &mut sig[auth_start..],
        &prv_seed,
        &pub_seed,
        idx_leaf,
        &ots_addr,
    );
    debug_assert_eq!(
        root[..],
        pub_root[..],
        "recomputed root diverges from the stored public root"
    );

    ots_seed.zeroize();
    wots_sk.zeroize();
    prv_seed.zeroize();
    prf_seed.zeroize();

    Ok(sig)
}

/// Verifies a detached signature over `m` under a raw `[root || pubSeed]`
/// public key. Every failure mode returns `false`; callers cannot tell a
/// malformed signature from a root mismatch.
pub(crate) fn xmss_verify(params: &XmssParams, m: &[u8], sig: &[u8], pk: &[u8]) -> bool {
    let n = params.n;
    let ib = params.index_bytes;

    if sig.len() != params.sig_bytes || pk.len() != params.pk_bytes {
        return false;
    }

    let pub_root = &pk[..n];
    let pub_seed = &pk[n..2 * n];

    // The index field must not address a leaf beyond the tree.
    let idx = bytes_to_ull(&sig[..ib]);
    if idx >= params.num_leaves() {
        return false;
    }

    let mut mhash = [0u8; XMSS_N];
    h_msg(&mut mhash, &sig[ib..ib + n], pub_root, idx, m);

    #[allow(clippy::cast_possible_truncation)]
    let idx_leaf = (idx & (params.num_leaves() - 1)) as u32;
    let idx_tree = idx >> params.tree_height;

    let mut ots_addr = Address::new();
    ots_addr.set_layer_addr(0);
    ots_addr.set_tree_addr(idx_tree);
    ots_addr.set_type(ADDR_TYPE_OTS);
    ots_addr.set_ots_addr(idx_leaf);

    let mut ltree_addr = Address::new();
    ltree_addr.set_layer_addr(0);
    ltree_addr.set_tree_addr(idx_tree);
    ltree_addr.set_type(ADDR_TYPE_LTREE);
    ltree_addr.set_ltree_addr(idx_leaf);

    let mut node_addr = Address::new();
    node_addr.set_layer_addr(0);
    node_addr.set_tree_addr(idx_tree);
    node_addr.set_type(ADDR_TYPE_HASHTREE);

    let wots_start = ib + n;
    let auth_start = wots_start + params.wots_sig_bytes;

    // The recovered WOTS+ public key is only correct if the signature is.
    let mut wots_pk = vec![0u8; params.wots_sig_bytes];
    wots_pk_from_sig(
        params,
        &mut wots_pk,
        &sig[wots_start..auth_start],
        &mhash,
        pub_seed,
        &ots_addr,
    );

    let mut leaf = [0u8; XMSS_N];
    l_tree(params, &mut leaf, &mut wots_pk, pub_seed, &ltree_addr);

    let mut root = [0u8; XMSS_N];
    compute_root(
        params,
        &mut root,
        &leaf,
        idx_leaf,
        &sig[auth_start..],
        pub_seed,
        &node_addr,
    );

    bool::from(root.as_slice().ct_eq(pub_root))
}
