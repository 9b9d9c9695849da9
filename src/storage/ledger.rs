// In-process stand-in for the external ledger runtime
// Verifies signed batches, runs each transaction through the handler inside a scoped
// context, and commits a batch's writes all together or not at all

use crate::core::addressing::is_family_address;
use crate::core::transaction::{Batch, BatchList};
use crate::error::{LedgerError, Result};
use crate::processor::ClaimsTransactionHandler;
use crate::state::{decode_list, Record};
use crate::storage::{ScopedContext, StateStore};
use crate::utils::{deserialize, short_id};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Committed,
    Invalid { reason: String },
}

pub struct LocalLedger<S: StateStore> {
    store: S,
    handler: ClaimsTransactionHandler,
    statuses: RwLock<HashMap<String, BatchStatus>>,
    // Held for a whole submission, so batches apply one at a time
    seen_transactions: Mutex<HashSet<String>>,
}

impl<S: StateStore> LocalLedger<S> {
    pub fn new(store: S) -> LocalLedger<S> {
        LocalLedger {
            store,
            handler: ClaimsTransactionHandler::new(),
            statuses: RwLock::new(HashMap::new()),
            seen_transactions: Mutex::new(HashSet::new()),
        }
    }

    pub fn get_store(&self) -> &S {
        &self.store
    }

    /// Execute and commit one batch. An invalid transaction invalidates the whole batch.
    pub fn submit_batch(&self, batch: &Batch) -> Result<()> {
        let batch_id = batch.get_header_signature().to_string();
        let mut seen = self
            .seen_transactions
            .lock()
            .map_err(|_| LedgerError::Database("Transaction id lock poisoned".to_string()))?;

        let outcome = self
            .execute_batch(batch, &seen)
            .and_then(|writes| self.store.put_all(writes));

        let status = match &outcome {
            Ok(()) => {
                for txn in batch.get_transactions() {
                    seen.insert(txn.get_header_signature().to_string());
                }
                info!(
                    "Committed batch {} with {} transaction(s)",
                    short_id(&batch_id),
                    batch.get_transactions().len()
                );
                BatchStatus::Committed
            }
            Err(e) => {
                warn!("Rejected batch {}: {e}", short_id(&batch_id));
                BatchStatus::Invalid {
                    reason: e.reason(),
                }
            }
        };
        self.statuses
            .write()
            .map_err(|_| LedgerError::Database("Batch status lock poisoned".to_string()))?
            .insert(batch_id, status);
        outcome
    }

    /// Submit every batch in order, returning each batch id with its status.
    pub fn submit_batch_list(&self, batch_list: &BatchList) -> Vec<(String, BatchStatus)> {
        batch_list
            .batches
            .iter()
            .map(|batch| {
                let status = match self.submit_batch(batch) {
                    Ok(()) => BatchStatus::Committed,
                    Err(e) => BatchStatus::Invalid {
                        reason: e.reason(),
                    },
                };
                (batch.get_header_signature().to_string(), status)
            })
            .collect()
    }

    pub fn batch_status(&self, batch_id: &str) -> Option<BatchStatus> {
        match self.statuses.read() {
            Ok(statuses) => statuses.get(batch_id).cloned(),
            Err(_) => {
                log::error!("Failed to acquire read lock on batch statuses");
                None
            }
        }
    }

    /// Decode the record at a full entity address.
    pub fn get<T: Record>(&self, address: &str) -> Result<Option<T>> {
        if !is_family_address(address) {
            return Err(LedgerError::InvalidInput(format!(
                "{address} is not a healthcare state address"
            )));
        }
        match self.store.get(address)? {
            Some(bytes) => Ok(Some(deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Decode every record under a list address or parent prefix.
    pub fn list<T: Record>(&self, prefix: &str) -> Result<Vec<T>> {
        decode_list(self.store.scan_prefix(prefix)?)
    }

    fn execute_batch(
        &self,
        batch: &Batch,
        seen: &HashSet<String>,
    ) -> Result<BTreeMap<String, Vec<u8>>> {
        batch.verify()?;

        let mut overlay = BTreeMap::new();
        let mut in_batch = HashSet::new();
        for txn in batch.get_transactions() {
            let txn_id = txn.get_header_signature();
            if seen.contains(txn_id) || !in_batch.insert(txn_id) {
                return Err(LedgerError::DuplicateTransaction(txn_id.to_string()));
            }
            let header = txn.header()?;
            let pending = {
                let mut context =
                    ScopedContext::new(&self.store, &overlay, header.inputs, header.outputs);
                self.handler.apply(txn, &mut context)?;
                context.into_pending()
            };
            overlay.extend(pending);
        }
        Ok(overlay)
    }
}
