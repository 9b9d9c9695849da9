//! Command-line interface
//!
//! Argument parsing for key management, the per-action transaction
//! builders and state listing.

pub mod commands;

pub use commands::{Command, Opt, SignerArgs};
