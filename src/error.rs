/// Errors used throughout this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// All one-time signatures have been used.
    #[error("key exhausted: all one-time signatures have been used")]
    KeyExhausted,
    /// The entropy source failed to produce the seed bytes for key generation.
    #[error("entropy source failure during key generation")]
    EntropyFailure,
    /// The tree height is not one of the supported parameter sets.
    #[error("invalid tree height: {0} (supported heights: 10, 16, 20)")]
    InvalidTreeHeight(u32),
    /// The provided seed has an incorrect length.
    #[error("invalid seed length: expected {expected}, got {got}")]
    InvalidSeedLength {
        /// Expected seed length in bytes.
        expected: usize,
        /// Actual seed length in bytes.
        got: usize,
    },
    /// The provided key has an incorrect length.
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length in bytes.
        got: usize,
    },
    /// The provided signature has an incorrect length.
    #[error("invalid signature length: expected {expected}, got {got}")]
    InvalidSignatureLength {
        /// Expected signature length in bytes.
        expected: usize,
        /// Actual signature length in bytes.
        got: usize,
    },
}

/// Result type used by this crate.
pub type XmssResult<T> = Result<T, Error>;
