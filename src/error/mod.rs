//! Error handling for the claims ledger
//!
//! Addressing, codec and state errors are domain-typed and propagate up with `?`.
//! The transaction processor folds every one of them into `InvalidTransaction`
//! before the ledger runtime sees it.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed identity or payload fields supplied by the caller
    InvalidInput(String),
    /// Payload bytes do not resolve to a populated tagged variant
    MalformedPayload(String),
    /// Payload discriminant the processor has no handler for
    UnhandledAction(u32),
    /// State access outside the transaction's declared inputs/outputs
    AddressNotAuthorized(String),
    /// Create-style mutation against an already populated address
    EntityAlreadyExists(String),
    /// Update-style mutation or reference to an empty address
    EntityNotFound(String),
    /// Umbrella rejection surfaced to the ledger runtime
    InvalidTransaction(String),
    /// Key material could not produce a signature
    SigningFailure(String),
    /// Transaction id already seen by the ledger
    DuplicateTransaction(String),
    /// Other cryptographic errors (key generation, hex decoding)
    Crypto(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// State store errors
    Database(String),
    /// File I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
}

impl LedgerError {
    /// Human-readable reason without the category prefix.
    pub fn reason(&self) -> String {
        match self {
            LedgerError::UnhandledAction(kind) => format!("Unhandled action: {kind}"),
            LedgerError::InvalidInput(msg)
            | LedgerError::MalformedPayload(msg)
            | LedgerError::AddressNotAuthorized(msg)
            | LedgerError::EntityAlreadyExists(msg)
            | LedgerError::EntityNotFound(msg)
            | LedgerError::InvalidTransaction(msg)
            | LedgerError::SigningFailure(msg)
            | LedgerError::DuplicateTransaction(msg)
            | LedgerError::Crypto(msg)
            | LedgerError::Serialization(msg)
            | LedgerError::Database(msg)
            | LedgerError::Io(msg)
            | LedgerError::Config(msg) => msg.clone(),
        }
    }

    /// Re-signal any error as the rejection outcome the runtime understands.
    pub fn into_invalid_transaction(self) -> LedgerError {
        match self {
            LedgerError::InvalidTransaction(_) => self,
            LedgerError::UnhandledAction(_) => LedgerError::InvalidTransaction(self.reason()),
            other => LedgerError::InvalidTransaction(other.to_string()),
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            LedgerError::MalformedPayload(msg) => write!(f, "Malformed payload: {msg}"),
            LedgerError::UnhandledAction(kind) => write!(f, "Unhandled action: {kind}"),
            LedgerError::AddressNotAuthorized(addr) => {
                write!(f, "Address not authorized: {addr}")
            }
            LedgerError::EntityAlreadyExists(msg) => write!(f, "Entity already exists: {msg}"),
            LedgerError::EntityNotFound(msg) => write!(f, "Entity not found: {msg}"),
            LedgerError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {msg}"),
            LedgerError::SigningFailure(msg) => write!(f, "Signing failure: {msg}"),
            LedgerError::DuplicateTransaction(id) => write!(f, "Duplicate transaction: {id}"),
            LedgerError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Database(msg) => write!(f, "Database error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<sled::Error> for LedgerError {
    fn from(err: sled::Error) -> Self {
        LedgerError::Database(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for LedgerError {
    fn from(err: bincode::error::EncodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for LedgerError {
    fn from(err: bincode::error::DecodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
