use ring::digest::{Context, SHA512};
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, KeyPair, UnparsedPublicKey, ECDSA_P256_SHA256_FIXED,
    ECDSA_P256_SHA256_FIXED_SIGNING,
};

use crate::error::{LedgerError, Result};
use data_encoding::HEXLOWER;
use rand::RngCore;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp() -> Result<u64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| LedgerError::Crypto(format!("System time error: {e}")))?;
    Ok(duration.as_secs())
}

pub fn sha512_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA512);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// Lowercase hex SHA-512, the digest used for addresses and payload hashes.
pub fn sha512_hex(data: &[u8]) -> String {
    HEXLOWER.encode(sha512_digest(data).as_slice())
}

pub fn hex_encode(data: &[u8]) -> String {
    HEXLOWER.encode(data)
}

pub fn hex_decode(data: &str) -> Result<Vec<u8>> {
    HEXLOWER
        .decode(data.as_bytes())
        .map_err(|e| LedgerError::Crypto(format!("Invalid hex encoding: {e}")))
}

/// First 16 characters of an id for log lines. Ids may come from untrusted bytes,
/// so this cuts on a character boundary.
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(16).map_or(id, |(end, _)| &id[..end])
}

/// Random bytes from the OS-seeded thread RNG, used for transaction nonces.
pub fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

pub fn new_key_pair() -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
        .map_err(|e| LedgerError::Crypto(format!("Failed to generate ECDSA key pair: {e}")))?
        .as_ref()
        .to_vec();
    Ok(pkcs8)
}

pub fn public_key_from_pkcs8(pkcs8: &[u8]) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
        .map_err(|e| LedgerError::Crypto(format!("Failed to create key pair from PKCS8: {e}")))?;
    Ok(key_pair.public_key().as_ref().to_vec())
}

pub fn ecdsa_p256_sha256_sign(pkcs8: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
        .map_err(|e| {
            LedgerError::SigningFailure(format!("Failed to create key pair from PKCS8: {e}"))
        })?;
    let signature = key_pair
        .sign(&rng, message)
        .map_err(|e| LedgerError::SigningFailure(format!("Failed to sign message: {e}")))?
        .as_ref()
        .to_vec();
    Ok(signature)
}

pub fn ecdsa_p256_sha256_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let peer_public_key = UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, public_key);
    peer_public_key.verify(message, signature).is_ok()
}

/// Verify a hex signature over `message` with a hex public key.
pub fn verify_signature(public_key_hex: &str, signature_hex: &str, message: &[u8]) -> bool {
    match (hex_decode(public_key_hex), hex_decode(signature_hex)) {
        (Ok(public_key), Ok(signature)) => {
            ecdsa_p256_sha256_verify(&public_key, &signature, message)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_respects_char_boundaries() {
        assert_eq!(short_id("0123456789abcdef0123"), "0123456789abcdef");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("aaaaaaaaaaaaaaa\u{20ac}\u{20ac}"), "aaaaaaaaaaaaaaa\u{20ac}");
    }

    #[test]
    fn test_sha512_hex_known_vector() {
        assert_eq!(
            sha512_hex(b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_sign_and_verify() {
        let pkcs8 = new_key_pair().unwrap();
        let public_key = public_key_from_pkcs8(&pkcs8).unwrap();
        let signature = ecdsa_p256_sha256_sign(&pkcs8, b"header bytes").unwrap();

        assert!(ecdsa_p256_sha256_verify(&public_key, &signature, b"header bytes"));
        assert!(!ecdsa_p256_sha256_verify(&public_key, &signature, b"other bytes"));
        assert!(verify_signature(
            &hex_encode(&public_key),
            &hex_encode(&signature),
            b"header bytes"
        ));
    }

    #[test]
    fn test_sign_with_bad_key_material_is_signing_failure() {
        let result = ecdsa_p256_sha256_sign(&[1, 2, 3], b"message");
        assert!(matches!(result, Err(LedgerError::SigningFailure(_))));
    }

    #[test]
    fn test_random_bytes_differ() {
        assert_ne!(random_bytes(16), random_bytes(16));
    }

    #[test]
    fn test_verify_signature_rejects_garbage_hex() {
        assert!(!verify_signature("zz", "zz", b"message"));
    }
}
