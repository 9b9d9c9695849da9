use crate::error::{LedgerError, Result};
use crate::state::TransactionContext;
use crate::utils::{deserialize, serialize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything storable at a state address.
pub trait Record: Serialize + for<'de> Deserialize<'de> + bincode::Encode + bincode::Decode<()> {}

impl<T> Record for T where
    T: Serialize + for<'de> Deserialize<'de> + bincode::Encode + bincode::Decode<()>
{
}

/// Typed view of ledger state for one transaction.
///
/// Writes are staged and only reach the context on [`ClaimsState::commit`], so a
/// rejected transaction leaves the context untouched.
pub struct ClaimsState<'a> {
    context: &'a mut dyn TransactionContext,
    staged: BTreeMap<String, Vec<u8>>,
}

impl<'a> ClaimsState<'a> {
    pub fn new(context: &'a mut dyn TransactionContext) -> ClaimsState<'a> {
        ClaimsState {
            context,
            staged: BTreeMap::new(),
        }
    }

    pub fn get(&self, addresses: &[String]) -> Result<BTreeMap<String, Vec<u8>>> {
        let missing: Vec<String> = addresses
            .iter()
            .filter(|address| !self.staged.contains_key(*address))
            .cloned()
            .collect();
        let mut found = if missing.is_empty() {
            BTreeMap::new()
        } else {
            self.context.get_state(&missing)?
        };
        for address in addresses {
            if let Some(value) = self.staged.get(address) {
                found.insert(address.clone(), value.clone());
            }
        }
        Ok(found)
    }

    pub fn set(&mut self, entries: BTreeMap<String, Vec<u8>>) {
        self.staged.extend(entries);
    }

    pub fn exists(&self, address: &str) -> Result<bool> {
        Ok(self.get_one(address)?.is_some())
    }

    pub fn load<T: Record>(&self, address: &str) -> Result<Option<T>> {
        match self.get_one(address)? {
            Some(bytes) => Ok(Some(deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Decode the record at `address`, failing with `EntityNotFound` when empty.
    pub fn load_or_fail<T: Record>(&self, address: &str, what: &str) -> Result<T> {
        self.load(address)?
            .ok_or_else(|| LedgerError::EntityNotFound(format!("{what} at {address}")))
    }

    /// Store `value` only if `address` is empty, else `EntityAlreadyExists`.
    pub fn create_if_absent<T: Record>(&mut self, address: &str, what: &str, value: &T) -> Result<()> {
        if self.exists(address)? {
            return Err(LedgerError::EntityAlreadyExists(format!(
                "{what} at {address}"
            )));
        }
        self.put(address, value)
    }

    /// Apply `mutator` to the stored record, failing with `EntityNotFound` when empty.
    pub fn update_existing<T, F>(&mut self, address: &str, what: &str, mutator: F) -> Result<T>
    where
        T: Record,
        F: FnOnce(&mut T) -> Result<()>,
    {
        let mut record: T = self.load_or_fail(address, what)?;
        mutator(&mut record)?;
        self.put(address, &record)?;
        Ok(record)
    }

    /// Unconditional write.
    pub fn put<T: Record>(&mut self, address: &str, value: &T) -> Result<()> {
        let bytes = serialize(value)?;
        self.staged.insert(address.to_string(), bytes);
        Ok(())
    }

    /// Flush staged writes to the context in a single call.
    pub fn commit(self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        self.context.set_state(self.staged)
    }

    fn get_one(&self, address: &str) -> Result<Option<Vec<u8>>> {
        let mut found = self.get(&[address.to_string()])?;
        Ok(found.remove(address))
    }
}

/// Decode every entry of a prefix listing, in address order.
pub fn decode_list<T, I>(entries: I) -> Result<Vec<T>>
where
    T: Record,
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    entries
        .into_iter()
        .map(|(address, bytes)| {
            deserialize(&bytes).map_err(|e| {
                LedgerError::Serialization(format!("Bad record at {address}: {}", e.reason()))
            })
        })
        .collect()
}
