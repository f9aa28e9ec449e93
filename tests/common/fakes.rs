//! In-memory backends that write every interaction to a shared journal.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use stepper_transact::blockchain::BlockchainError;
use stepper_transact::gas::types::{SimulationOutcome, SimulationResult};
use stepper_transact::gas::{GasEstimationError, GasEstimator, SimulationRequest, SimulationResponse};
use stepper_transact::safe::{SafeError, SafeProposer, SafeTransaction, SafeTxParams};
use stepper_transact::transact::{
    DirectSigner, ModalControl, ProgressSink, Receipt, StatusMessage, SubmittedTransaction,
    TransactResult,
};

/// Ordered log of everything the fakes observed.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }
}

/// Call descriptor whose target and data are `byte` repeated.
pub fn call(byte: u8) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(Address::repeat_byte(byte))
        .with_input(Bytes::from(vec![byte; 4]))
}

pub fn label(request: &TransactionRequest) -> String {
    let to = request.to.as_ref().and_then(|kind| kind.to().copied()).unwrap_or_default();
    format!("{:02x}", to[19])
}

pub struct JournalModal(pub Journal);

impl ModalControl for JournalModal {
    fn set_hideable(&self, hideable: bool) {
        self.0.push(format!("hideable={}", hideable));
    }
}

pub struct JournalSink(pub Journal);

impl ProgressSink for JournalSink {
    fn update(&self, status: StatusMessage) {
        self.0.push(format!("status: {}", status.message));
    }
}

/// Direct signer whose transaction hashes repeat the target's last byte.
pub struct FakeSigner {
    journal: Journal,
    submitted: AtomicUsize,
    /// Zero-based index of the submission that the "user" rejects.
    reject_at: Option<usize>,
}

impl FakeSigner {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            submitted: AtomicUsize::new(0),
            reject_at: None,
        }
    }

    pub fn rejecting_at(journal: Journal, index: usize) -> Self {
        Self {
            reject_at: Some(index),
            ..Self::new(journal)
        }
    }
}

#[async_trait]
impl DirectSigner for FakeSigner {
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> TransactResult<Box<dyn SubmittedTransaction>> {
        let index = self.submitted.fetch_add(1, Ordering::SeqCst);
        if self.reject_at == Some(index) {
            self.journal.push(format!("rejected {}", label(request)));
            return Err(BlockchainError::Wallet("user rejected transaction".into()).into());
        }

        let to = request.to.as_ref().and_then(|kind| kind.to().copied()).unwrap_or_default();
        self.journal.push(format!("submit {}", label(request)));
        Ok(Box::new(FakeTransaction {
            hash: TxHash::repeat_byte(to[19]),
            journal: self.journal.clone(),
        }))
    }
}

pub struct FakeTransaction {
    pub hash: TxHash,
    pub journal: Journal,
}

impl FakeTransaction {
    pub fn receipt(hash: TxHash) -> Receipt {
        Receipt {
            transaction_hash: hash,
            block_number: Some(100 + hash[31] as u64),
            success: true,
            gas_used: 21_000,
            logs: Vec::new(),
        }
    }
}

#[async_trait]
impl SubmittedTransaction for FakeTransaction {
    fn hash(&self) -> TxHash {
        self.hash
    }

    async fn wait(&self, confirmations: u64) -> TransactResult<Receipt> {
        // Give an out-of-order submission a chance to sneak in
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.journal
            .push(format!("confirmed {:02x} x{}", self.hash[31], confirmations));
        Ok(Self::receipt(self.hash))
    }
}

/// Estimator answering with fixed per-simulation gas figures.
pub struct FakeEstimator {
    journal: Journal,
    gas_used: Vec<u64>,
    pub requests: Mutex<Vec<SimulationRequest>>,
}

impl FakeEstimator {
    pub fn new(journal: Journal, gas_used: Vec<u64>) -> Self {
        Self {
            journal,
            gas_used,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GasEstimator for FakeEstimator {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, GasEstimationError> {
        self.journal
            .push(format!("simulate {}", request.simulations.len()));
        self.requests.lock().unwrap().push(request.clone());
        Ok(SimulationResponse {
            simulation_results: self
                .gas_used
                .iter()
                .map(|&gas_used| SimulationResult {
                    simulation: SimulationOutcome { gas_used },
                })
                .collect(),
        })
    }
}

/// Proposer remembering every batch it was handed.
pub struct FakeProposer {
    journal: Journal,
    pub proposals: Mutex<Vec<(Vec<SafeTransaction>, SafeTxParams)>>,
}

impl FakeProposer {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            proposals: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SafeProposer for FakeProposer {
    async fn propose_batch(
        &self,
        txs: &[SafeTransaction],
        params: SafeTxParams,
    ) -> Result<B256, SafeError> {
        self.journal.push(format!(
            "propose {} gas={}",
            txs.len(),
            params.safe_tx_gas.map(|g| g.to_string()).unwrap_or_default()
        ));
        self.proposals.lock().unwrap().push((txs.to_vec(), params));
        Ok(B256::repeat_byte(0xee))
    }
}
