//! State access for the transaction processor
//!
//! The ledger runtime hands the processor a [`TransactionContext`] scoped to one
//! transaction; [`ClaimsState`] layers typed read-modify-write helpers on top of it.

pub mod accessor;

pub use accessor::{decode_list, ClaimsState, Record};

use crate::error::Result;
use std::collections::BTreeMap;

/// Capability handle over ledger state for a single transaction.
///
/// Implementations must refuse addresses outside the transaction's declared
/// inputs (reads) and outputs (writes) with `AddressNotAuthorized`.
pub trait TransactionContext {
    /// Values for the requested addresses; empty addresses are simply absent.
    fn get_state(&self, addresses: &[String]) -> Result<BTreeMap<String, Vec<u8>>>;

    fn set_state(&mut self, entries: BTreeMap<String, Vec<u8>>) -> Result<()>;
}
