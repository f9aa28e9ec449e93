//! HTTP proposal backend for Safe mode.

use alloy::primitives::{Address, TxHash, B256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::time::Duration;

use crate::blockchain::types::BlockchainError;
use crate::config::SafeConfig;
use crate::safe::types::{
    ProposalBody, ProposalResponse, SafeError, SafeTransaction, SafeTxParams,
};
use crate::safe::SafeProposer;
use crate::transact::backend::{DirectSigner, Receipt, SubmittedTransaction};
use crate::transact::error::TransactResult;

/// Posts proposals to a Safe proposal endpoint.
///
/// Also acts as the wallet's signer in Safe mode: a single call is proposed
/// as a one-element batch.
#[derive(Debug, Clone)]
pub struct HttpSafeProposer {
    client: reqwest::Client,
    proposal_url: String,
    safe_address: Address,
}

impl HttpSafeProposer {
    pub fn new(config: &SafeConfig) -> Result<Self, SafeError> {
        let safe_address: Address = config
            .address
            .parse()
            .map_err(|e| SafeError::Config(format!("invalid address '{}': {}", config.address, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            proposal_url: config.proposal_url.clone(),
            safe_address,
        })
    }

    pub fn safe_address(&self) -> Address {
        self.safe_address
    }
}

#[async_trait]
impl SafeProposer for HttpSafeProposer {
    async fn propose_batch(
        &self,
        txs: &[SafeTransaction],
        params: SafeTxParams,
    ) -> Result<B256, SafeError> {
        let body = ProposalBody { txs, params };
        let resp = self
            .client
            .post(&self.proposal_url)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(SafeError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let proposal: ProposalResponse = serde_json::from_str(&text)?;
        tracing::info!(
            safe = %self.safe_address,
            safe_tx_hash = %proposal.safe_tx_hash,
            transactions = txs.len(),
            safe_tx_gas = ?params.safe_tx_gas,
            "Proposal submitted to Safe"
        );
        Ok(proposal.safe_tx_hash)
    }
}

#[async_trait]
impl DirectSigner for HttpSafeProposer {
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> TransactResult<Box<dyn SubmittedTransaction>> {
        let tx = SafeTransaction::from_request(request)
            .ok_or(SafeError::InvalidCall("needs `to` and `data` and no native value"))?;
        let safe_tx_hash = self.propose_batch(&[tx], SafeTxParams::default()).await?;
        Ok(Box::new(ProposedTransaction { safe_tx_hash }))
    }
}

/// A proposal awaiting co-signers.
#[derive(Debug, Clone, Copy)]
pub struct ProposedTransaction {
    pub safe_tx_hash: B256,
}

#[async_trait]
impl SubmittedTransaction for ProposedTransaction {
    fn hash(&self) -> TxHash {
        self.safe_tx_hash
    }

    async fn wait(&self, _confirmations: u64) -> TransactResult<Receipt> {
        Err(BlockchainError::NotAvailable(
            "Safe proposals are confirmed by co-signers outside this flow".to_string(),
        )
        .into())
    }
}
