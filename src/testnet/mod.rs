//! Test network fixtures for ledger testing
//!
//! In-memory and sled-backed local ledgers plus enrolled clinic, doctor and
//! patient keys, so tests can start from a populated state.

pub mod test_utils;

pub use test_utils::*;
