//! TOML configuration for the runner.
//!
//! Every section is optional; a missing file or table falls back to
//! `Default`, which targets a local node and local helper services.

use serde::{Deserialize, Serialize};

/// Root configuration for the transaction orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TransactConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Chain connection and direct-signer settings.
    pub blockchain: BlockchainConfig,

    /// Gas Estimation Service settings (multisig batches only).
    pub gas_estimation: GasEstimationConfig,

    /// Multisig (Safe) proposal settings.
    pub safe: SafeConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Human-readable network name, used for explorer links.
    pub network_name: String,

    /// Block explorer base URL. Derived from `network_name` when unset.
    pub explorer_url: Option<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a submitted transaction to confirm.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            network_name: "mainnet".to_string(),
            explorer_url: None,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 600,
            poll_interval_ms: 2000,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// Gas Estimation Service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasEstimationConfig {
    /// Simulation endpoint accepting batched simulation requests.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GasEstimationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/tenderly/simulate".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Multisig proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SafeConfig {
    /// Route transactions through the Safe instead of a local key.
    pub enabled: bool,

    /// Address of the Safe account.
    pub address: String,

    /// Endpoint accepting batch proposals.
    pub proposal_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SafeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: String::new(),
            proposal_url: "http://localhost:3000/api/safe/propose".to_string(),
            timeout_secs: 30,
        }
    }
}
