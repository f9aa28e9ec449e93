//! Transaction orchestration for stepper-driven wallet flows.
//!
//! Runs the "prepare, sign, wait for confirmation, finalize" sequence for one
//! or many transactions against either a direct signer or a Safe multisig,
//! and reports progress to the UI that drives it.

pub mod blockchain;
pub mod config;
pub mod gas;
pub mod job;
pub mod observability;
pub mod safe;
pub mod transact;

pub use config::TransactConfig;
pub use transact::{TransactPayload, TransactionSpec, Transactor, WalletState};
