//! JSON-RPC access for the direct signer.
//!
//! Every read goes to the primary endpoint first and falls through the
//! configured failovers on error or timeout. Reverts during gas estimation
//! are deterministic and are returned without failing over.

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Run `$call` against each provider in turn; yields the first answer.
macro_rules! with_failover {
    ($client:expr, $what:literal, |$provider:ident| $call:expr) => {{
        let mut answer = None;
        let mut last_error = String::from("no provider configured");
        for (provider_idx, $provider) in $client.providers.iter().enumerate() {
            match timeout($client.rpc_timeout, $call).await {
                Ok(Ok(value)) => {
                    answer = Some(value);
                    break;
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx, error = %e, "RPC {} failed", $what);
                    last_error = e.to_string();
                }
                Err(_) => {
                    tracing::warn!(provider_idx, "RPC {} timed out", $what);
                    last_error = format!("timed out after {:?}", $client.rpc_timeout);
                }
            }
        }
        answer.ok_or_else(|| {
            BlockchainError::Rpc(format!("{} failed on every provider: {}", $what, last_error))
        })
    }};
}

/// RPC endpoints of one chain, tried in configuration order.
#[derive(Clone)]
pub struct BlockchainClient {
    providers: Vec<DynProvider>,
    rpc_timeout: Duration,
    config: BlockchainConfig,
}

impl BlockchainClient {
    /// Connect to the configured endpoints.
    ///
    /// An unreachable node or a chain id mismatch is only logged here; the
    /// first real call reports it.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let primary: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let mut providers: Vec<DynProvider> = Vec::with_capacity(1 + config.failover_urls.len());
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary)));
        for raw in &config.failover_urls {
            match raw.parse::<url::Url>() {
                Ok(url) => providers.push(Arc::new(ProviderBuilder::new().connect_http(url))),
                Err(e) => tracing::warn!(url = %raw, error = %e, "Skipping invalid failover RPC URL"),
            }
        }

        let client = Self {
            providers,
            rpc_timeout: Duration::from_secs(config.rpc_timeout_secs),
            config,
        };

        if let Err(e) = client.verify_chain_id().await {
            tracing::warn!(error = %e, rpc_url = %client.config.rpc_url, "Could not verify chain id");
        } else {
            tracing::info!(
                rpc_url = %client.config.rpc_url,
                chain_id = client.config.chain_id,
                failovers = client.providers.len() - 1,
                "RPC client connected"
            );
        }

        Ok(client)
    }

    /// Fails when the node serves a different chain than configured.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let ChainId(actual) = self.get_chain_id().await?;
        if actual != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(())
    }

    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        with_failover!(self, "eth_chainId", |provider| provider.get_chain_id()).map(ChainId)
    }

    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        with_failover!(self, "eth_blockNumber", |provider| provider.get_block_number())
    }

    /// Pending-inclusive nonce of `address`.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        with_failover!(self, "eth_getTransactionCount", |provider| provider
            .get_transaction_count(address)
            .pending())
    }

    /// Gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        with_failover!(self, "eth_gasPrice", |provider| provider.get_gas_price())
    }

    /// Gas limit for one call. An RPC error here is usually a revert, which
    /// every provider would report alike, so it ends the attempt.
    pub async fn estimate_gas(&self, request: &TransactionRequest) -> BlockchainResult<u64> {
        for (provider_idx, provider) in self.providers.iter().enumerate() {
            match timeout(self.rpc_timeout, provider.estimate_gas(request.clone())).await {
                Ok(Ok(gas)) => return Ok(gas),
                Ok(Err(e)) => {
                    return Err(BlockchainError::Rpc(format!("Gas estimation failed: {}", e)))
                }
                Err(_) => tracing::warn!(provider_idx, "RPC eth_estimateGas timed out"),
            }
        }
        Err(BlockchainError::Rpc(
            "eth_estimateGas timed out on every provider".to_string(),
        ))
    }

    /// `None` while the transaction is still pending.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        with_failover!(self, "eth_getTransactionReceipt", |provider| provider
            .get_transaction_receipt(tx_hash))
    }

    /// Broadcast an EIP-2718 encoded signed transaction.
    pub async fn send_raw_transaction(&self, encoded: &[u8]) -> BlockchainResult<TxHash> {
        with_failover!(self, "eth_sendRawTransaction", |provider| provider
            .send_raw_transaction(encoded))
        .map(|pending| *pending.tx_hash())
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("providers", &self.providers.len())
            .field("chain_id", &self.config.chain_id)
            .finish()
    }
}
