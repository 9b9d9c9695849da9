use crate::error::{LedgerError, Result};
use crate::storage::StateStore;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// ( K -> address, V => record bytes )
pub struct MemoryStore {
    inner: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(state) => state.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on memory store");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the whole state, for comparing before/after snapshots.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        match self.inner.read() {
            Ok(state) => state.clone(),
            Err(_) => {
                log::error!("Failed to acquire read lock on memory store");
                BTreeMap::new()
            }
        }
    }
}

impl StateStore for MemoryStore {
    fn get(&self, address: &str) -> Result<Option<Vec<u8>>> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::Database("Memory store lock poisoned".to_string()))?;
        Ok(state.get(address).cloned())
    }

    fn put_all(&self, entries: BTreeMap<String, Vec<u8>>) -> Result<()> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| LedgerError::Database("Memory store lock poisoned".to_string()))?;
        state.extend(entries);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::Database("Memory store lock poisoned".to_string()))?;
        Ok(state
            .range(prefix.to_string()..)
            .take_while(|(address, _)| address.starts_with(prefix))
            .map(|(address, value)| (address.clone(), value.clone()))
            .collect())
    }
}
