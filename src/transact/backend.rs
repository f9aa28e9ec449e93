//! Signing backend seam.
//!
//! The orchestrator only sees these traits; `blockchain::ProviderSigner` and
//! `safe::HttpSafeProposer` are the shipped implementations.

use alloy::primitives::TxHash;
use alloy::rpc::types::{Log, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::transact::error::TransactResult;

/// Confirmation record of one submitted transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
    pub gas_used: u64,
    pub logs: Vec<Log>,
}

impl From<TransactionReceipt> for Receipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            gas_used: u64::try_from(receipt.gas_used).unwrap_or(u64::MAX),
            logs: receipt.inner.logs().to_vec(),
        }
    }
}

/// Handle to a transaction that has been handed to the network (or proposed
/// to a multisig).
#[async_trait]
pub trait SubmittedTransaction: Send + Sync {
    fn hash(&self) -> TxHash;

    /// Block until `confirmations` blocks include the transaction.
    async fn wait(&self, confirmations: u64) -> TransactResult<Receipt>;
}

/// Submits pre-built call descriptors on behalf of the active account.
#[async_trait]
pub trait DirectSigner: Send + Sync {
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> TransactResult<Box<dyn SubmittedTransaction>>;
}
