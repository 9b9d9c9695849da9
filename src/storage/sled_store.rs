// On-disk state for the CLI's local ledger
// One sled tree keyed by address; batches are written with apply_batch so they land atomically

use crate::error::{LedgerError, Result};
use crate::storage::StateStore;
use sled::{Db, Tree};
use std::collections::BTreeMap;
use std::path::Path;

const STATE_TREE: &str = "state";

pub struct SledStore {
    db: Db,
    tree: Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<SledStore> {
        let db = sled::open(path.as_ref())
            .map_err(|e| LedgerError::Database(format!("Failed to open database: {e}")))?;
        let tree = db
            .open_tree(STATE_TREE)
            .map_err(|e| LedgerError::Database(format!("Failed to open state tree: {e}")))?;
        Ok(SledStore { db, tree })
    }

    pub fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| LedgerError::Database(format!("Failed to flush state: {e}")))?;
        Ok(())
    }
}

impl StateStore for SledStore {
    fn get(&self, address: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .tree
            .get(address.as_bytes())
            .map_err(|e| LedgerError::Database(format!("Failed to get {address}: {e}")))?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put_all(&self, entries: BTreeMap<String, Vec<u8>>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for (address, value) in entries {
            batch.insert(address.as_bytes(), value);
        }
        self.tree
            .apply_batch(batch)
            .map_err(|e| LedgerError::Database(format!("Failed to write state: {e}")))?;
        self.flush()
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut entries = vec![];
        for item in self.tree.scan_prefix(prefix.as_bytes()) {
            let (k, v) = item.map_err(|e| {
                LedgerError::Database(format!("Failed to iterate state tree: {e}"))
            })?;
            let address = String::from_utf8(k.to_vec())
                .map_err(|e| LedgerError::Database(format!("Invalid address key: {e}")))?;
            entries.push((address, v.to_vec()));
        }
        Ok(entries)
    }
}
