// Signed transaction and batch envelopes
// A transaction header commits to its payload through payload_sha512 and is signed by the
// transacting key; a batch header lists transaction ids in order and is signed by the batcher

use crate::core::addressing::{FAMILY_NAME, FAMILY_VERSION};
use crate::error::{LedgerError, Result};
use crate::signing::Signer;
use crate::utils::{deserialize, random_bytes, serialize, sha512_hex, verify_signature};
use serde::{Deserialize, Serialize};

/// Random bytes mixed into every transaction header.
pub const NONCE_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TransactionHeader {
    pub family_name: String,
    pub family_version: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub signer_public_key: String,
    pub batcher_public_key: String,
    pub dependencies: Vec<String>,
    pub nonce: Vec<u8>,
    pub payload_sha512: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    header: Vec<u8>,
    header_signature: String,
    payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct BatchHeader {
    pub signer_public_key: String,
    pub transaction_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Batch {
    header: Vec<u8>,
    header_signature: String,
    transactions: Vec<Transaction>,
}

/// The unit handed to the ledger runtime for submission.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct BatchList {
    pub batches: Vec<Batch>,
}

impl Transaction {
    /// Build and sign a transaction for this family.
    ///
    /// Nothing is returned unless the header signature was produced.
    pub fn new(
        payload: Vec<u8>,
        inputs: Vec<String>,
        outputs: Vec<String>,
        txn_signer: &Signer,
        batcher_public_key: &str,
    ) -> Result<Transaction> {
        let header = TransactionHeader {
            family_name: FAMILY_NAME.to_string(),
            family_version: FAMILY_VERSION.to_string(),
            inputs,
            outputs,
            signer_public_key: txn_signer.public_key_hex(),
            batcher_public_key: batcher_public_key.to_string(),
            dependencies: vec![],
            nonce: random_bytes(NONCE_LEN),
            payload_sha512: sha512_hex(&payload),
        };
        let header_bytes = serialize(&header)?;
        let header_signature = txn_signer.sign(&header_bytes)?;
        Ok(Transaction {
            header: header_bytes,
            header_signature,
            payload,
        })
    }

    pub fn get_header_bytes(&self) -> &[u8] {
        self.header.as_slice()
    }

    /// The header signature doubles as the transaction id.
    pub fn get_header_signature(&self) -> &str {
        self.header_signature.as_str()
    }

    pub fn get_payload(&self) -> &[u8] {
        self.payload.as_slice()
    }

    pub fn header(&self) -> Result<TransactionHeader> {
        deserialize(&self.header)
    }

    /// Check the header signature and the payload digest.
    pub fn verify(&self) -> Result<TransactionHeader> {
        let header = self.header()?;
        if !verify_signature(
            &header.signer_public_key,
            &self.header_signature,
            &self.header,
        ) {
            return Err(LedgerError::InvalidTransaction(format!(
                "Bad header signature on transaction {}",
                self.header_signature
            )));
        }
        if header.payload_sha512 != sha512_hex(&self.payload) {
            return Err(LedgerError::InvalidTransaction(format!(
                "Payload digest mismatch on transaction {}",
                self.header_signature
            )));
        }
        Ok(header)
    }
}

impl Batch {
    /// Sign a batch header over `transactions` in the given order.
    pub fn new(transactions: Vec<Transaction>, batch_signer: &Signer) -> Result<Batch> {
        if transactions.is_empty() {
            return Err(LedgerError::InvalidInput(
                "A batch needs at least one transaction".to_string(),
            ));
        }
        let header = BatchHeader {
            signer_public_key: batch_signer.public_key_hex(),
            transaction_ids: transactions
                .iter()
                .map(|txn| txn.header_signature.clone())
                .collect(),
        };
        let header_bytes = serialize(&header)?;
        let header_signature = batch_signer.sign(&header_bytes)?;
        Ok(Batch {
            header: header_bytes,
            header_signature,
            transactions,
        })
    }

    pub fn get_header_bytes(&self) -> &[u8] {
        self.header.as_slice()
    }

    /// The header signature doubles as the batch id.
    pub fn get_header_signature(&self) -> &str {
        self.header_signature.as_str()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn header(&self) -> Result<BatchHeader> {
        deserialize(&self.header)
    }

    /// Check the batch signature, the transaction id list and every transaction.
    pub fn verify(&self) -> Result<BatchHeader> {
        let header = self.header()?;
        if !verify_signature(&header.signer_public_key, &self.header_signature, &self.header) {
            return Err(LedgerError::InvalidTransaction(format!(
                "Bad header signature on batch {}",
                self.header_signature
            )));
        }
        let ids: Vec<&str> = self
            .transactions
            .iter()
            .map(|txn| txn.get_header_signature())
            .collect();
        if header.transaction_ids.iter().map(String::as_str).ne(ids) {
            return Err(LedgerError::InvalidTransaction(format!(
                "Batch {} header does not match its transactions",
                self.header_signature
            )));
        }
        for txn in &self.transactions {
            let txn_header = txn.verify()?;
            if txn_header.batcher_public_key != header.signer_public_key {
                return Err(LedgerError::InvalidTransaction(format!(
                    "Transaction {} names a different batcher",
                    txn.get_header_signature()
                )));
            }
        }
        Ok(header)
    }
}

impl BatchList {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<BatchList> {
        deserialize(bytes)
    }
}

/// Accumulates transactions that share one batcher and seals them into a single batch.
pub struct BatchBuilder<'a> {
    batch_signer: &'a Signer,
    transactions: Vec<Transaction>,
}

impl<'a> BatchBuilder<'a> {
    pub fn new(batch_signer: &'a Signer) -> BatchBuilder<'a> {
        BatchBuilder {
            batch_signer,
            transactions: vec![],
        }
    }

    pub fn add_transaction(
        &mut self,
        payload: Vec<u8>,
        inputs: Vec<String>,
        outputs: Vec<String>,
        txn_signer: &Signer,
    ) -> Result<&mut Self> {
        let txn = Transaction::new(
            payload,
            inputs,
            outputs,
            txn_signer,
            &self.batch_signer.public_key_hex(),
        )?;
        self.transactions.push(txn);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sign the batch, returning it together with its id.
    pub fn build(self) -> Result<(Batch, String)> {
        let batch = Batch::new(self.transactions, self.batch_signer)?;
        let batch_id = batch.get_header_signature().to_string();
        Ok((batch, batch_id))
    }
}
