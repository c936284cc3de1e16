use core::fmt;

use hybrid_array::ArraySize;
use hybrid_array::typenum::{U2, U4, U32};

use crate::error::{Error, XmssResult};

/// Type-level sum: `TSum<A, B>` = A + B.
type TSum<A, B> = <A as core::ops::Add<B>>::Output;
/// Type-level product: `TProd<A, B>` = A * B.
type TProd<A, B> = <A as core::ops::Mul<B>>::Output;

/// Hash output length in bytes for SHA2-256.
pub(crate) const XMSS_N: usize = 32;

/// Length of the index prefix in private keys and signatures, in bytes.
pub(crate) const XMSS_INDEX_BYTES: usize = 4;

/// Trait defining an XMSS parameter set at compile time.
#[allow(private_interfaces)]
pub trait XmssParameter: Sized + Clone + fmt::Debug + Default + 'static {
    /// Signing key length as a type-level unsigned integer.
    type SkLen: ArraySize + fmt::Debug + Clone + PartialEq + Eq;
    /// Verifying key length as a type-level unsigned integer.
    type VkLen: ArraySize + fmt::Debug + Clone + PartialEq + Eq;

    /// Human-readable name, e.g. "XMSS-SHA2_10_256".
    const NAME: &'static str;
    /// Merkle tree height.
    const TREE_HEIGHT: u32;
    /// Signing key length in bytes.
    const SK_LEN: usize;
    /// Verifying key length in bytes.
    const VK_LEN: usize;
    /// Detached signature length in bytes.
    const SIG_LEN: usize;
    /// Key-generation seed length in bytes (3*n).
    const SEED_LEN: usize;

    /// Build the runtime parameter record for internal computation.
    #[doc(hidden)]
    fn params() -> XmssParams;
}

// Const helpers used by the macro to compute sizes from (n, h).

const fn xmss_sk_len(n: usize) -> usize {
    XMSS_INDEX_BYTES + 4 * n
}

const fn xmss_vk_len(n: usize) -> usize {
    2 * n
}

const fn xmss_sig_len(n: usize, h: usize) -> usize {
    let wots_len = 2 * n + 3;
    XMSS_INDEX_BYTES + n + wots_len * n + h * n
}

const fn xmss_seed_len(n: usize) -> usize {
    3 * n
}

macro_rules! define_xmss_parameter {
    ($name:ident, $str_name:expr, h = $h:expr) => {
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        #[allow(non_camel_case_types)]
        #[doc = concat!("Parameter set for `", $str_name, "`.")]
        pub struct $name;

        #[allow(private_interfaces)]
        impl XmssParameter for $name {
            type SkLen = TSum<U4, TProd<U32, U4>>;
            type VkLen = TProd<U32, U2>;
            const NAME: &'static str = $str_name;
            const TREE_HEIGHT: u32 = $h;
            const SK_LEN: usize = xmss_sk_len(XMSS_N);
            const VK_LEN: usize = xmss_vk_len(XMSS_N);
            const SIG_LEN: usize = xmss_sig_len(XMSS_N, $h);
            const SEED_LEN: usize = xmss_seed_len(XMSS_N);

            #[allow(clippy::unwrap_used)]
            fn params() -> XmssParams {
                XmssParams::new($h).unwrap()
            }
        }
    };
}

define_xmss_parameter!(XmssSha2_10_256, "XMSS-SHA2_10_256", h = 10);
define_xmss_parameter!(XmssSha2_16_256, "XMSS-SHA2_16_256", h = 16);
define_xmss_parameter!(XmssSha2_20_256, "XMSS-SHA2_20_256", h = 20);

/// Runtime parameter record. Every size is derived from (n, w, h); nothing
/// is stored that could disagree with the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct XmssParams {
    pub(crate) n: usize,
    pub(crate) wots_w: u32,
    pub(crate) wots_log_w: u32,
    pub(crate) wots_len1: usize,
    pub(crate) wots_len2: usize,
    pub(crate) wots_len: usize,
    pub(crate) wots_sig_bytes: usize,
    pub(crate) tree_height: u32,
    pub(crate) index_bytes: usize,
    pub(crate) sig_bytes: usize,
    pub(crate) sk_bytes: usize,
    pub(crate) pk_bytes: usize,
}

impl XmssParams {
    /// Builds the parameter record for one of the supported tree heights.
    pub(crate) fn new(tree_height: u32) -> XmssResult<Self> {
        match tree_height {
            10 | 16 | 20 => Ok(Self::derive(tree_height)),
            h => Err(Error::InvalidTreeHeight(h)),
        }
    }

    /// Derives the full parameter record for a tree height without
    /// validating it; heights outside [`Self::new`] are reachable only
    /// from tests.
    pub(crate) const fn derive(tree_height: u32) -> Self {
        let n = XMSS_N;
        let wots_w = 16u32;
        let wots_log_w = 4u32;
        let wots_len1 = 8 * n / wots_log_w as usize;
        let wots_len2 = 3usize;
        let wots_len = wots_len1 + wots_len2;
        let wots_sig_bytes = wots_len * n;
        let index_bytes = XMSS_INDEX_BYTES;
        Self {
            n,
            wots_w,
            wots_log_w,
            wots_len1,
            wots_len2,
            wots_len,
            wots_sig_bytes,
            tree_height,
            index_bytes,
            sig_bytes: index_bytes + n + wots_sig_bytes + tree_height as usize * n,
            sk_bytes: index_bytes + 4 * n,
            pk_bytes: 2 * n,
        }
    }

    /// Number of one-time leaves, 2^h.
    pub(crate) const fn num_leaves(&self) -> u64 {
        1u64 << self.tree_height
    }

    /// Key-generation seed length (prvSeed || prfSeed || pubSeed).
    pub(crate) const fn seed_len(&self) -> usize {
        3 * self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_sizes_match_the_parameter_sets() {
        for (height, sig_bytes) in [(10, 2500), (16, 2692), (20, 2820)] {
            let params = XmssParams::derive(height);
            assert_eq!(params.n, 32);
            assert_eq!(params.wots_len1, 64);
            assert_eq!(params.wots_len2, 3);
            assert_eq!(params.wots_len, 67);
            assert_eq!(params.wots_sig_bytes, 2144);
            assert_eq!(params.sig_bytes, sig_bytes);
            assert_eq!(params.sk_bytes, 132);
            assert_eq!(params.pk_bytes, 64);
        }
    }

    #[test]
    fn const_lengths_agree_with_the_runtime_record() {
        fn check<P: XmssParameter>() {
            let params = P::params();
            assert_eq!(P::SK_LEN, params.sk_bytes);
            assert_eq!(P::VK_LEN, params.pk_bytes);
            assert_eq!(P::SIG_LEN, params.sig_bytes);
            assert_eq!(P::SEED_LEN, params.seed_len());
            assert_eq!(P::TREE_HEIGHT, params.tree_height);
            assert_eq!(<P::SkLen as hybrid_array::typenum::Unsigned>::USIZE, P::SK_LEN);
            assert_eq!(<P::VkLen as hybrid_array::typenum::Unsigned>::USIZE, P::VK_LEN);
        }
        check::<XmssSha2_10_256>();
        check::<XmssSha2_16_256>();
        check::<XmssSha2_20_256>();
    }

    #[test]
    fn unsupported_heights_are_rejected() {
        for height in [0, 2, 9, 12, 21, 64] {
            assert!(matches!(
                XmssParams::new(height),
                Err(Error::InvalidTreeHeight(h)) if h == height
            ));
        }
        assert!(XmssParams::new(16).is_ok());
    }

    #[test]
    fn leaf_counts_follow_the_height() {
        assert_eq!(XmssParams::derive(10).num_leaves(), 1024);
        assert_eq!(XmssParams::derive(20).num_leaves(), 1 << 20);
    }
}
