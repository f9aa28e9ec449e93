//! Direct signer over a local key and the RPC client.
//!
//! # Responsibilities
//! - Complete call descriptors (nonce, gas price, gas limit, chain id)
//! - Sign and broadcast transactions
//! - Monitor confirmations

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::transact::backend::{DirectSigner, Receipt, SubmittedTransaction};
use crate::transact::error::TransactResult;

/// Signs with a local [`Wallet`] and broadcasts through a [`BlockchainClient`].
#[derive(Debug, Clone)]
pub struct ProviderSigner {
    client: BlockchainClient,
    wallet: Wallet,
}

impl ProviderSigner {
    pub fn new(client: BlockchainClient, wallet: Wallet) -> Self {
        Self { client, wallet }
    }

    /// Fill in everything the caller's call descriptor leaves out.
    pub async fn build(&self, request: &TransactionRequest) -> BlockchainResult<TransactionRequest> {
        let chain_nonce = self.client.get_transaction_count(self.wallet.address()).await?;
        self.wallet.observe_chain_nonce(chain_nonce);

        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        let config = self.client.config();
        if gas_price_gwei > config.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: config.max_gas_price_gwei,
            });
        }
        let adjusted_gas_price = (gas_price as f64 * config.gas_price_multiplier) as u128;

        let mut tx = request.clone().with_from(self.wallet.address());
        if tx.gas.is_none() {
            let gas_limit = self.client.estimate_gas(&tx).await?;
            tx.set_gas_limit(gas_limit);
        }

        Ok(tx
            .with_nonce(self.wallet.reserve_nonce())
            .with_gas_price(adjusted_gas_price)
            .with_chain_id(self.wallet.chain_id()))
    }

    async fn sign_and_broadcast(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let envelope = tx
            .build(&self.wallet.ethereum_wallet())
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
        self.client.send_raw_transaction(&envelope.encoded_2718()).await
    }
}

#[async_trait]
impl DirectSigner for ProviderSigner {
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> TransactResult<Box<dyn SubmittedTransaction>> {
        let tx = self.build(request).await?;
        let nonce = tx.nonce.unwrap_or_default();

        let tx_hash = match self.sign_and_broadcast(tx).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                // The nonce never reached the mempool; hand it to the next call
                let released = self.wallet.release_nonce(nonce);
                tracing::warn!(nonce, released, error = %e, "Broadcast failed");
                return Err(e.into());
            }
        };

        tracing::info!(tx_hash = %tx_hash, nonce, "Transaction broadcast");

        Ok(Box::new(PendingTransaction {
            tx_hash,
            client: self.client.clone(),
        }))
    }
}

/// A broadcast transaction awaiting confirmation.
#[derive(Debug)]
pub struct PendingTransaction {
    tx_hash: TxHash,
    client: BlockchainClient,
}

impl PendingTransaction {
    /// Poll for the receipt until `required` blocks include it.
    pub async fn wait_for_confirmation(&self, required: u64) -> BlockchainResult<Receipt> {
        let config = self.client.config();
        let timeout_secs = config.confirmation_timeout_secs;
        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        let tx_hash = self.tx_hash;

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(tx_hash));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block counts as the first confirmation
                let confirmations = current_block.saturating_sub(tx_block) + 1;

                if confirmations >= required {
                    return Ok(Receipt::from(receipt));
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                timeout_secs,
            }),
        }
    }
}

#[async_trait]
impl SubmittedTransaction for PendingTransaction {
    fn hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn wait(&self, confirmations: u64) -> TransactResult<Receipt> {
        Ok(self.wait_for_confirmation(confirmations).await?)
    }
}
