//! # Medclaim Chain - Medical Claims Ledger Transaction Family
//!
//! Client and processor for the `healthcare` transaction family: clinics, doctors,
//! patients and clients register themselves, clinics file claims and record doctor
//! assignments, and patients grant or revoke a doctor's access to their records.
//!
//! ## How the Code Is Organized
//! - `core/`: state addressing, the payload codec, entity records, signed
//!   transaction/batch envelopes and the per-action builders
//! - `processor/`: the transaction handler the ledger runtime calls per transaction
//! - `state/`: the transaction context seam and typed state helpers
//! - `storage/`: state backends, the scoped context and a local ledger that
//!   executes batches the way the runtime does
//! - `signing/`: signing keys and the named key store
//! - `config/`: state and key store paths
//! - `utils/`: digests, ECDSA, hex and bincode helpers
//! - `cli/`: command-line interface
//!
//! ## Where to Start
//! 1. `main.rs` for the CLI commands
//! 2. `core/addressing.rs` for how entities map to 70-character addresses
//! 3. `core/builder.rs` for how an action becomes a signed batch
//! 4. `processor/handler.rs` for the rules each action enforces

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod processor;
pub mod signing;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    Action, Batch, BatchBuilder, BatchList, EntityKind, PayloadType, Transaction,
    TransactionHeader, TransactionPayload,
};
pub use error::{LedgerError, Result};
pub use processor::ClaimsTransactionHandler;
pub use signing::{KeyStore, Signer};
pub use state::{decode_list, ClaimsState, Record, TransactionContext};
pub use storage::{BatchStatus, LocalLedger, MemoryStore, ScopedContext, SledStore, StateStore};
pub use utils::{
    current_timestamp, ecdsa_p256_sha256_sign, ecdsa_p256_sha256_verify, hex_decode, hex_encode,
    new_key_pair, sha512_digest, sha512_hex, verify_signature,
};
