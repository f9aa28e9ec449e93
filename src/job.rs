//! Job files for the command-line runner.
//!
//! ```json
//! {
//!   "before_message": "Preparing...",
//!   "transactions": [
//!     { "to": "0x…", "data": "0x…", "signature_message": "Approve the token" }
//!   ]
//! }
//! ```

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::gas::SimulationRequest;
use crate::transact::{TransactPayload, TransactionSpec, Transactions};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Job contains no transactions")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTransaction {
    pub to: Address,
    pub data: Bytes,
    #[serde(default)]
    pub value: U256,
    pub signature_message: Option<String>,
    pub confirmation_message: Option<String>,
}

impl JobTransaction {
    pub fn request(&self) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.to)
            .with_input(self.data.clone())
            .with_value(self.value)
    }

    fn spec(&self) -> TransactionSpec {
        let mut spec = TransactionSpec::populated(self.request());
        if let Some(message) = &self.signature_message {
            spec = spec.with_signature_message(message.as_str());
        }
        if let Some(message) = &self.confirmation_message {
            spec = spec.with_confirmation_message(message.as_str());
        }
        spec
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub transactions: Vec<JobTransaction>,
    pub before_message: Option<String>,
    pub after_message: Option<String>,
}

impl Job {
    pub fn from_file(path: &Path) -> Result<Self, JobError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, JobError> {
        let job: Job = serde_json::from_str(content)?;
        if job.transactions.is_empty() {
            return Err(JobError::Empty);
        }
        Ok(job)
    }

    /// Simulation request for the whole job, as a Safe batch would send it.
    pub fn simulation_request(&self, chain_id: u64, from: Address) -> SimulationRequest {
        SimulationRequest::for_batch(
            chain_id,
            from,
            self.transactions.iter().map(|tx| (tx.to, &tx.data)),
        )
    }

    /// One transaction runs as a single call, several as a batch.
    pub fn into_payload(self) -> TransactPayload {
        let Job {
            transactions,
            before_message,
            after_message,
        } = self;

        let mut payload = TransactPayload::new(move |_: &()| {
            let mut specs: Vec<TransactionSpec> =
                transactions.iter().map(JobTransaction::spec).collect();
            if specs.len() == 1 {
                Transactions::Single(specs.remove(0))
            } else {
                Transactions::Batch(specs)
            }
        })
        .after(|receipts, ()| async move {
            let gas_used: u64 = receipts.iter().map(|r| r.gas_used).sum();
            tracing::info!(receipts = receipts.len(), gas_used, "All transactions confirmed");
            Ok(())
        });

        if let Some(message) = before_message {
            payload = payload.during_before(message.as_str());
        }
        if let Some(message) = after_message {
            payload = payload.during_after(message.as_str());
        }
        payload
    }
}
