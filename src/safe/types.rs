//! Multisig proposal types.

use alloy::primitives::{Address, Bytes, B256};
use alloy::rpc::types::TransactionRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of the multisig account the wallet is proxied through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeInfo {
    pub address: Address,
}

/// One call inside a multisig proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeTransaction {
    pub to: Address,
    pub data: Bytes,
    /// Decimal wei string, as the proposal API expects.
    pub value: String,
}

impl SafeTransaction {
    /// Zero-value call taken from a pre-built descriptor.
    ///
    /// `None` when the descriptor has no call target, no input data, or
    /// carries native value; batched calls never move value.
    pub fn from_request(request: &TransactionRequest) -> Option<Self> {
        if request.value.is_some_and(|value| !value.is_zero()) {
            return None;
        }
        let to = *request.to.as_ref()?.to()?;
        let data = request.input.input()?.clone();
        Some(Self {
            to,
            data,
            value: "0".to_string(),
        })
    }
}

/// Execution parameters attached to a proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTxParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_tx_gas: Option<u64>,
}

impl SafeTxParams {
    pub fn with_gas(safe_tx_gas: u64) -> Self {
        Self {
            safe_tx_gas: Some(safe_tx_gas),
        }
    }
}

/// Request body of a proposal.
#[derive(Debug, Serialize)]
pub struct ProposalBody<'a> {
    pub txs: &'a [SafeTransaction],
    pub params: SafeTxParams,
}

/// Answer of the proposal endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub safe_tx_hash: B256,
}

/// Errors from the proposal backend.
#[derive(Debug, Error)]
pub enum SafeError {
    #[error("Safe request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Safe service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed Safe response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid Safe configuration: {0}")]
    Config(String),

    #[error("Call cannot be proposed: {0}")]
    InvalidCall(&'static str),
}
