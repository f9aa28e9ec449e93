//! Multisig (Safe) proposal subsystem.
//!
//! # Data Flow
//! ```text
//! batched call descriptors
//!     → types.rs (SafeTransaction { to, data, value: "0" })
//!     → client.rs (POST { txs, params: { safeTxGas } })
//!     → safeTxHash
//! ```
//!
//! Proposals resolve out of band: co-signers confirm later, so nothing here
//! waits for on-chain inclusion.

pub mod client;
pub mod types;

use alloy::primitives::B256;
use async_trait::async_trait;

pub use client::{HttpSafeProposer, ProposedTransaction};
pub use types::{SafeError, SafeInfo, SafeTransaction, SafeTxParams};

/// Backend accepting atomic batch proposals for a multisig account.
#[async_trait]
pub trait SafeProposer: Send + Sync {
    async fn propose_batch(
        &self,
        txs: &[SafeTransaction],
        params: SafeTxParams,
    ) -> Result<B256, SafeError>;
}
