//! Key management
//!
//! Transacting and batching key pairs, plus a file-backed store of named signers for the CLI.

pub mod keystore;
pub mod signer;

pub use keystore::KeyStore;
pub use signer::Signer;
