//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Identity of the network the active wallet is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub chain_id: ChainId,
    /// Short network name, e.g. "mainnet" or "sepolia".
    pub name: String,
    /// Block explorer base URL without trailing slash.
    pub explorer_url: String,
}

impl Network {
    /// Build a network whose explorer is Etherscan's deployment for `name`.
    pub fn new(chain_id: u64, name: impl Into<String>) -> Self {
        let name = name.into();
        let explorer_url = etherscan_base(&name);
        Self {
            chain_id: ChainId(chain_id),
            name,
            explorer_url,
        }
    }

    /// Override the explorer base URL.
    pub fn with_explorer(mut self, explorer_url: impl Into<String>) -> Self {
        self.explorer_url = explorer_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build from configuration.
    pub fn from_config(config: &BlockchainConfig) -> Self {
        let network = Self::new(config.chain_id, config.network_name.clone());
        match &config.explorer_url {
            Some(url) => network.with_explorer(url.clone()),
            None => network,
        }
    }

    /// Explorer page for a transaction hash.
    pub fn tx_url(&self, hash: &TxHash) -> String {
        format!("{}/tx/{}", self.explorer_url, hash)
    }
}

fn etherscan_base(name: &str) -> String {
    match name {
        "mainnet" | "homestead" => "https://etherscan.io".to_string(),
        other => format!("https://{}.etherscan.io", other),
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {tx_hash} not confirmed after {timeout_secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, timeout_secs: u64 },

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The operation is not offered by this backend.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
