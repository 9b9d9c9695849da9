use crate::error::Result;
use crate::utils::{
    ecdsa_p256_sha256_sign, hex_encode, new_key_pair, public_key_from_pkcs8,
};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

/// An ECDSA P-256 key pair that signs transaction and batch headers.
///
/// The PKCS#8 document is wiped from memory when the signer is dropped.
#[derive(Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode, ZeroizeOnDrop)]
pub struct Signer {
    pkcs8: Vec<u8>,
    public_key: Vec<u8>,
}

impl Signer {
    pub fn new() -> Result<Signer> {
        let pkcs8 = new_key_pair()?;
        Self::from_pkcs8(pkcs8)
    }

    pub fn from_pkcs8(pkcs8: Vec<u8>) -> Result<Signer> {
        let public_key = public_key_from_pkcs8(&pkcs8)?;
        Ok(Signer { pkcs8, public_key })
    }

    pub fn get_public_key(&self) -> &[u8] {
        self.public_key.as_slice()
    }

    /// Hex public key, the identity used in addresses and headers.
    pub fn public_key_hex(&self) -> String {
        hex_encode(&self.public_key)
    }

    /// Hex signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Result<String> {
        let signature = ecdsa_p256_sha256_sign(&self.pkcs8, message)?;
        Ok(hex_encode(&signature))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::utils::verify_signature;

    #[test]
    fn test_public_key_is_uncompressed_p256_point() {
        let signer = Signer::new().unwrap();
        assert_eq!(signer.get_public_key().len(), 65);
        assert_eq!(signer.public_key_hex().len(), 130);
    }

    #[test]
    fn test_signature_verifies_under_public_key() {
        let signer = Signer::new().unwrap();
        let signature = signer.sign(b"payload").unwrap();
        assert!(verify_signature(&signer.public_key_hex(), &signature, b"payload"));
    }

    #[test]
    fn test_from_invalid_pkcs8_fails() {
        let result = Signer::from_pkcs8(vec![0u8; 12]);
        assert!(matches!(result, Err(LedgerError::Crypto(_))));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let signer = Signer::new().unwrap();
        let debug = format!("{signer:?}");
        assert!(debug.contains(&signer.public_key_hex()));
        assert!(!debug.contains("pkcs8"));
    }
}
