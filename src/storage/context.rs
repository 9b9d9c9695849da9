use crate::error::{LedgerError, Result};
use crate::state::TransactionContext;
use crate::storage::StateStore;
use std::collections::BTreeMap;

/// Context for one transaction, limited to the header's declared addresses.
///
/// Reads must match an input and writes an output; a declared entry matches
/// itself and every address it prefixes. Reads see this transaction's own
/// writes, then writes from earlier transactions in the same batch, then the store.
pub struct ScopedContext<'a> {
    store: &'a dyn StateStore,
    overlay: &'a BTreeMap<String, Vec<u8>>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    pending: BTreeMap<String, Vec<u8>>,
}

impl<'a> ScopedContext<'a> {
    pub fn new(
        store: &'a dyn StateStore,
        overlay: &'a BTreeMap<String, Vec<u8>>,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> ScopedContext<'a> {
        ScopedContext {
            store,
            overlay,
            inputs,
            outputs,
            pending: BTreeMap::new(),
        }
    }

    /// Writes made through this context, ready to merge into the batch.
    pub fn into_pending(self) -> BTreeMap<String, Vec<u8>> {
        self.pending
    }
}

fn authorized(declared: &[String], address: &str) -> bool {
    declared
        .iter()
        .any(|entry| address.starts_with(entry.as_str()))
}

impl TransactionContext for ScopedContext<'_> {
    fn get_state(&self, addresses: &[String]) -> Result<BTreeMap<String, Vec<u8>>> {
        let mut found = BTreeMap::new();
        for address in addresses {
            if !authorized(&self.inputs, address) {
                return Err(LedgerError::AddressNotAuthorized(format!(
                    "{address} is not a declared input"
                )));
            }
            let value = match self.pending.get(address).or_else(|| self.overlay.get(address)) {
                Some(value) => Some(value.clone()),
                None => self.store.get(address)?,
            };
            if let Some(value) = value {
                found.insert(address.clone(), value);
            }
        }
        Ok(found)
    }

    fn set_state(&mut self, entries: BTreeMap<String, Vec<u8>>) -> Result<()> {
        if let Some(address) = entries.keys().find(|a| !authorized(&self.outputs, a)) {
            return Err(LedgerError::AddressNotAuthorized(format!(
                "{address} is not a declared output"
            )));
        }
        self.pending.extend(entries);
        Ok(())
    }
}
