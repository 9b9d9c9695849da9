//! Ledger state storage
//!
//! Key/value backends for ledger state, the per-transaction scoped context the
//! processor runs against, and a local ledger that executes signed batches the
//! way the external runtime does.

pub mod context;
pub mod ledger;
pub mod memory_store;
pub mod sled_store;

pub use context::ScopedContext;
pub use ledger::{BatchStatus, LocalLedger};
pub use memory_store::MemoryStore;
pub use sled_store::SledStore;

use crate::error::Result;
use std::collections::BTreeMap;

/// Address-keyed state backend.
pub trait StateStore: Send + Sync {
    fn get(&self, address: &str) -> Result<Option<Vec<u8>>>;

    /// Write every entry or none of them.
    fn put_all(&self, entries: BTreeMap<String, Vec<u8>>) -> Result<()>;

    /// All entries whose address starts with `prefix`, in address order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;
}
