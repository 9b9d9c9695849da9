//! Utility functions and helpers
//!
//! Digests, ECDSA signing, hex encoding and the bincode wire helpers
//! shared by the builder, the processor and the key store.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    current_timestamp, ecdsa_p256_sha256_sign, ecdsa_p256_sha256_verify, hex_decode, hex_encode,
    new_key_pair, public_key_from_pkcs8, random_bytes, sha512_digest, sha512_hex, short_id,
    verify_signature,
};

pub use serialization::{deserialize, serialize};
