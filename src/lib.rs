//! Single-tree XMSS (eXtended Merkle Signature Scheme) in Rust.
//!
//! Implements the RFC 8391 XMSS hash-based signature scheme over SHA2-256
//! for tree heights 10, 16 and 20 ([`XmssSha2_10_256`], [`XmssSha2_16_256`],
//! [`XmssSha2_20_256`]).
//!
//! XMSS is stateful: a private key holds a monotonically advancing leaf
//! index, and every signature consumes one leaf. The updated signing key
//! MUST be durably stored before a signature is released, and one key must
//! never sign from two places at once; a single index reuse forfeits all
//! security. Key and signature layouts are the raw RFC 8391
//! byte strings without an OID prefix.
//!
//! Key generation and signing recompute the full Merkle tree, so both cost
//! O(2^h) hash invocations; verification is cheap.

mod error;
mod hash;
mod hash_address;
mod keys;
mod params;
mod tree;
mod utils;
mod wots;
mod xmss;

pub use error::{Error, XmssResult};
pub use keys::{KeyPair, Signature, SigningKey, VerifyingKey};
pub use params::{XmssParameter, XmssSha2_10_256, XmssSha2_16_256, XmssSha2_20_256};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XmssParams;
    use crate::utils::bytes_to_ull;
    use crate::xmss::{xmss_seed_keypair, xmss_sign, xmss_verify};

    #[test]
    fn sign_verify_round_trip() {
        let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[0u8; 96]).unwrap();
        assert_eq!(kp.signing_key().index(), 0);

        let msg = [0u8; 32];
        let sig = kp.signing_key().sign(&msg).unwrap();
        assert_eq!(kp.signing_key().index(), 1);
        assert_eq!(bytes_to_ull(&sig.as_ref()[..4]), 0);
        assert!(kp.verifying_key().verify(&sig, &msg));
    }

    #[test]
    fn generate_sign_verify() {
        let mut kp = KeyPair::<XmssSha2_10_256>::generate(&mut rand::rng()).unwrap();

        let message = b"test message";
        let sig = kp.signing_key().sign(message).unwrap();
        assert!(kp.verifying_key().verify(&sig, message));
    }

    #[test]
    fn tampered_signature_or_message_fails() {
        let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[0u8; 96]).unwrap();
        let msg = [0u8; 32];
        let sig = kp.signing_key().sign(&msg).unwrap();

        let mut bytes = Vec::from(sig.clone());
        let last = bytes.len() - 1;
        bytes[last] ^= 1;
        let bad = Signature::<XmssSha2_10_256>::try_from(bytes.as_slice()).unwrap();
        assert!(!kp.verifying_key().verify(&bad, &msg));

        // Flipping the bit back restores validity.
        bytes[last] ^= 1;
        let good = Signature::<XmssSha2_10_256>::try_from(bytes).unwrap();
        assert!(kp.verifying_key().verify(&good, &msg));

        let mut bad_msg = msg;
        bad_msg[0] ^= 0x80;
        assert!(!kp.verifying_key().verify(&sig, &bad_msg));
    }

    #[test]
    fn corrupted_wots_chain_fails() {
        let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[5u8; 96]).unwrap();
        let msg = b"test message";
        let sig = kp.signing_key().sign(msg).unwrap();

        // Corrupt a byte in the middle of the WOTS+ part.
        let mut bytes = Vec::from(sig);
        bytes[100] ^= 0xff;
        let bad = Signature::<XmssSha2_10_256>::try_from(bytes).unwrap();
        assert!(!kp.verifying_key().verify(&bad, msg));
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let result = Signature::<XmssSha2_10_256>::try_from(&[0u8; 100][..]);
        assert!(matches!(
            result,
            Err(Error::InvalidSignatureLength {
                expected: 2500,
                got: 100
            })
        ));
    }

    #[test]
    fn toy_height_exhausts_after_four_signatures() {
        let params = XmssParams::derive(2);
        let mut pk = vec![0u8; params.pk_bytes];
        let mut sk = vec![0u8; params.sk_bytes];
        xmss_seed_keypair(&params, &mut pk, &mut sk, &[0u8; 96]);

        for i in 0..4u64 {
            let sig = xmss_sign(&params, &mut sk, b"toy").expect("leaves remain");
            assert_eq!(bytes_to_ull(&sig[..4]), i);
            assert!(xmss_verify(&params, b"toy", &sig, &pk));
        }
        assert!(matches!(
            xmss_sign(&params, &mut sk, b"toy"),
            Err(Error::KeyExhausted)
        ));
    }

    #[test]
    fn sixteen_signatures_are_monotonic_and_verify() {
        let seed: Vec<u8> = (0u8..96).collect();
        let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&seed).unwrap();
        let pk = kp.verifying_key().clone();

        let mut sigs = Vec::new();
        for i in 0..16u64 {
            #[allow(clippy::cast_possible_truncation)]
            let msg = [i as u8; 32];
            let sig = kp.signing_key().sign(&msg).unwrap();
            assert_eq!(bytes_to_ull(&sig.as_ref()[..4]), i);
            sigs.push((msg, sig));
        }
        assert_eq!(kp.signing_key().index(), 16);

        // The index is self-describing, so each signature verifies on its
        // own in any order.
        for (msg, sig) in sigs.iter().rev() {
            assert!(pk.verify(sig, msg));
        }
    }

    #[test]
    fn last_index_signs_then_exhausts() {
        let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[3u8; 96]).unwrap();

        // Patch the index to the last valid position (2^10 - 1 = 1023);
        // it sits at bytes[0..4], big-endian.
        let mut sk_bytes = kp.signing_key().as_ref().to_vec();
        sk_bytes[..4].copy_from_slice(&1023u32.to_be_bytes());
        let mut last_sk = SigningKey::<XmssSha2_10_256>::try_from(sk_bytes).unwrap();
        assert_eq!(last_sk.remaining_signatures(), 1);

        let sig = last_sk.sign(b"last message").unwrap();
        assert!(kp.verifying_key().verify(&sig, b"last message"));
        assert_eq!(last_sk.remaining_signatures(), 0);

        assert!(matches!(last_sk.sign(b"one more"), Err(Error::KeyExhausted)));
    }

    #[test]
    fn byte_layout_survives_persistence() {
        let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[7u8; 96]).unwrap();
        let msg = b"layout stability";
        let sig = kp.signing_key().sign(msg).unwrap();

        let sk_bytes = kp.signing_key().as_ref().to_vec();
        let pk_bytes = kp.verifying_key().as_ref().to_vec();
        let sig_bytes = sig.as_ref().to_vec();

        let mut sk2 = SigningKey::<XmssSha2_10_256>::try_from(sk_bytes.as_slice()).unwrap();
        let pk2 = VerifyingKey::<XmssSha2_10_256>::try_from(pk_bytes.as_slice()).unwrap();
        let sig2 = Signature::<XmssSha2_10_256>::try_from(sig_bytes.as_slice()).unwrap();

        assert!(pk2.verify(&sig2, msg));
        assert_eq!(sk2.index(), 1);

        // The reloaded signer continues from the persisted index.
        let sig3 = sk2.sign(b"next message").unwrap();
        assert_eq!(bytes_to_ull(&sig3.as_ref()[..4]), 1);
        assert!(pk2.verify(&sig3, b"next message"));
    }

    #[test]
    fn deterministic_keygen_matches() {
        // Sequential seed pattern: prvSeed || prfSeed || pubSeed.
        let seed: Vec<u8> = (0u8..96).collect();

        let kp1 = KeyPair::<XmssSha2_10_256>::from_seed(&seed).unwrap();
        let mut kp2 = KeyPair::<XmssSha2_10_256>::from_seed(&seed).unwrap();

        assert_eq!(kp1.verifying_key(), kp2.verifying_key());

        // Sign with one, verify with the other's public key.
        let sig = kp2.signing_key().sign(b"deterministic test").unwrap();
        assert!(kp1.verifying_key().verify(&sig, b"deterministic test"));
    }

    #[test]
    fn verifying_key_derived_from_signing_key() {
        let kp = KeyPair::<XmssSha2_10_256>::from_seed(&[9u8; 96]).unwrap();
        let derived = VerifyingKey::from(kp.signing_key_ref());
        assert_eq!(kp.verifying_key(), &derived);
    }

    #[test]
    fn seed_length_is_validated() {
        assert!(matches!(
            KeyPair::<XmssSha2_10_256>::from_seed(&[0u8; 95]),
            Err(Error::InvalidSeedLength {
                expected: 96,
                got: 95
            })
        ));
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn signing_key_json_round_trip() {
            let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[1u8; 96]).unwrap();
            let sk = kp.signing_key();

            let json = serde_json::to_string(&*sk).unwrap();
            let sk2: SigningKey<XmssSha2_10_256> = serde_json::from_str(&json).unwrap();
            assert_eq!(*sk, sk2);
        }

        #[test]
        fn verifying_key_json_round_trip() {
            let kp = KeyPair::<XmssSha2_10_256>::from_seed(&[1u8; 96]).unwrap();
            let pk = kp.verifying_key();

            let json = serde_json::to_string(pk).unwrap();
            let pk2: VerifyingKey<XmssSha2_10_256> = serde_json::from_str(&json).unwrap();
            assert_eq!(*pk, pk2);
        }

        #[test]
        fn signature_json_round_trip() {
            let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[1u8; 96]).unwrap();
            let sig = kp.signing_key().sign(b"test message").unwrap();

            let json = serde_json::to_string(&sig).unwrap();
            let sig2: Signature<XmssSha2_10_256> = serde_json::from_str(&json).unwrap();
            assert_eq!(sig, sig2);
        }

        #[test]
        fn signature_postcard_round_trip() {
            let mut kp = KeyPair::<XmssSha2_10_256>::from_seed(&[1u8; 96]).unwrap();
            let sig = kp.signing_key().sign(b"test message").unwrap();

            let bytes = postcard::to_allocvec(&sig).unwrap();
            let sig2: Signature<XmssSha2_10_256> = postcard::from_bytes(&bytes).unwrap();
            assert_eq!(sig, sig2);
        }
    }
}
