//! Configuration management
//!
//! Paths for the local ledger state and the key store, seeded from
//! environment variables and overridable from the command line.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
