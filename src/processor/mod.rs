//! Transaction processor
//!
//! The state machine the ledger runtime invokes once per ordered transaction:
//! decode, validate, dispatch, mutate, then commit or reject.

pub mod handler;

pub use handler::ClaimsTransactionHandler;
