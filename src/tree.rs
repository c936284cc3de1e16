use zeroize::Zeroize;

use crate::hash::{prf, thash_h};
use crate::hash_address::{ADDR_TYPE_HASHTREE, ADDR_TYPE_LTREE, ADDR_TYPE_OTS, Address};
use crate::params::{XMSS_N, XmssParams};
use crate::wots::{expand_seed, wots_pkgen};

/// Computes a leaf node from a WOTS+ public key using an L-tree
/// (RFC 8391 Algorithm 8). The public key buffer is consumed as scratch.
pub(crate) fn l_tree(
    params: &XmssParams,
    leaf: &mut [u8],
    wots_pk: &mut [u8],
    pub_seed: &[u8],
    addr: &Address,
) {
    let n = params.n;
    let mut l = params.wots_len;
    let mut height: u32 = 0;
    let mut addr = *addr;

    addr.set_tree_height(height);

    while l > 1 {
        let parent_nodes = l >> 1;
        for i in 0..parent_nodes {
            #[allow(clippy::cast_possible_truncation)]
            addr.set_tree_index(i as u32);
            let mut pair = [0u8; 2 * XMSS_N];
            pair.copy_from_slice(&wots_pk[2 * i * n..(2 * i + 2) * n]);
            thash_h(&mut wots_pk[i * n..(i + 1) * n], &pair, pub_seed, &addr);
        }
        // An odd node on this row is promoted to the next row unhashed.
        if l & 1 == 1 {
            wots_pk.copy_within((l - 1) * n..l * n, (l >> 1) * n);
            l = (l >> 1) + 1;
        } else {
            l >>= 1;
        }
        height += 1;
        addr.set_tree_height(height);
    }
    leaf[..n].copy_from_slice(&wots_pk[..n]);
}

/// Derives the n-byte seed for the WOTS+ key pair at the given OTS address.
/// The chain, hash and keyAndMask words are zeroed on a copy before the PRF
/// call.
pub(crate) fn get_seed(out: &mut [u8], prv_seed: &[u8], addr: &Address) {
    let mut addr = *addr;
    addr.set_chain_addr(0);
    addr.set_hash_addr(0);
    addr.set_key_and_mask(0);
    prf(out, prv_seed, &addr.to_bytes());
}

/// Computes the leaf at a given address: seed derivation, WOTS+ key
/// expansion and public-key generation, then L-tree compression.
fn gen_leaf(
    params: &XmssParams,
    leaf: &mut [u8],
    prv_seed: &[u8],
    pub_seed: &[u8],
    ltree_addr: &Address,
    ots_addr: &Address,
) {
    let mut ots_seed = [0u8; XMSS_N];
    get_seed(&mut ots_seed, prv_seed, ots_addr);

    let mut sk = vec![0u8; params.wots_sig_bytes];
    expand_seed(params, &mut sk, &ots_seed);

    let mut pk = vec![0u8; params.wots_sig_bytes];
    wots_pkgen(params, &mut pk, &sk, pub_seed, ots_addr);

    ots_seed.zeroize();
    sk.zeroize();

    l_tree(params, leaf, &mut pk, pub_seed, ltree_addr);
}

/// For a given leaf index, computes the authentication path and the
/// resulting root node using Merkle's TreeHash algorithm (RFC 8391
/// Algorithm 9). The whole subtree is recomputed: 2^h leaves per call.
///
/// Expects the layer and tree words of `subtree_addr` to be set.
pub(crate) fn treehash(
    params: &XmssParams,
    root: &mut [u8],
    auth_path: &mut [u8],
    prv_seed: &[u8],
    pub_seed: &[u8],
    leaf_idx: u32,
    subtree_addr: &Address,
) {
    let n = params.n;
    let tree_height = params.tree_height as usize;
    let mut stack = vec![0u8; (tree_height + 1) * n];
    let mut heights = vec![0u32; tree_height + 1];
    let mut offset: usize = 0;

    let mut ots_addr = Address::new();
    let mut ltree_addr = Address::new();
    let mut node_addr = Address::new();

    ots_addr.copy_subtree_addr(subtree_addr);
    ltree_addr.copy_subtree_addr(subtree_addr);
    node_addr.copy_subtree_addr(subtree_addr);

    ots_addr.set_type(ADDR_TYPE_OTS);
    ltree_addr.set_type(ADDR_TYPE_LTREE);
    node_addr.set_type(ADDR_TYPE_HASHTREE);

    let num_leaves: u32 = 1 << params.tree_height;
    for idx in 0..num_leaves {
        // Add the next leaf node to the stack.
        ltree_addr.set_ltree_addr(idx);
        ots_addr.set_ots_addr(idx);
        gen_leaf(
            params,
            &mut stack[offset * n..(offset + 1) * n],
            prv_seed,
            pub_seed,
            &ltree_addr,
            &ots_addr,
        );
        heights[offset] = 0;
        offset += 1;

        // A fresh leaf is the level-0 auth node iff it is the sibling of
        // the target leaf.
        if (leaf_idx ^ 1) == idx {
            auth_path[..n].copy_from_slice(&stack[(offset - 1) * n..offset * n]);
        }

        // While the two top-most nodes are of equal height, hash them into
        // their parent. The tree-height word addresses the lower layer even
        // though the index is that of the new node one layer up.
        while offset >= 2 && heights[offset - 1] == heights[offset - 2] {
            let tree_idx = idx >> (heights[offset - 1] + 1);

            node_addr.set_tree_height(heights[offset - 1]);
            node_addr.set_tree_index(tree_idx);
            let mut pair = [0u8; 2 * XMSS_N];
            pair.copy_from_slice(&stack[(offset - 2) * n..offset * n]);
            thash_h(
                &mut stack[(offset - 2) * n..(offset - 1) * n],
                &pair,
                pub_seed,
                &node_addr,
            );
            offset -= 1;
            heights[offset - 1] += 1;

            if ((leaf_idx >> heights[offset - 1]) ^ 1) == tree_idx {
                let h = heights[offset - 1] as usize;
                auth_path[h * n..(h + 1) * n]
                    .copy_from_slice(&stack[(offset - 1) * n..offset * n]);
            }
        }
    }
    root[..n].copy_from_slice(&stack[..n]);
}

/// Computes a root node given a leaf and its authentication path
/// (RFC 8391 Algorithm 13).
pub(crate) fn compute_root(
    params: &XmssParams,
    root: &mut [u8],
    leaf: &[u8],
    mut leaf_idx: u32,
    auth_path: &[u8],
    pub_seed: &[u8],
    addr: &Address,
) {
    let n = params.n;
    let mut addr = *addr;
    let mut buffer = [0u8; 2 * XMSS_N];
    let mut auth_offset = 0usize;

    // An odd leaf index means the leaf is a right child and the auth node
    // goes on the left; even is the other way around.
    if leaf_idx & 1 == 1 {
        buffer[n..2 * n].copy_from_slice(&leaf[..n]);
        buffer[..n].copy_from_slice(&auth_path[..n]);
    } else {
        buffer[..n].copy_from_slice(&leaf[..n]);
        buffer[n..2 * n].copy_from_slice(&auth_path[..n]);
    }
    auth_offset += n;

    for i in 0..params.tree_height - 1 {
        addr.set_tree_height(i);
        leaf_idx >>= 1;
        addr.set_tree_index(leaf_idx);

        let pair = buffer;
        if leaf_idx & 1 == 1 {
            thash_h(&mut buffer[n..2 * n], &pair, pub_seed, &addr);
            buffer[..n].copy_from_slice(&auth_path[auth_offset..auth_offset + n]);
        } else {
            thash_h(&mut buffer[..n], &pair, pub_seed, &addr);
            buffer[n..2 * n].copy_from_slice(&auth_path[auth_offset..auth_offset + n]);
        }
        auth_offset += n;
    }

    addr.set_tree_height(params.tree_height - 1);
    leaf_idx >>= 1;
    addr.set_tree_index(leaf_idx);
    thash_h(root, &buffer, pub_seed, &addr);
}
