//! Sign / confirm / finalize sequencing.
//!
//! # Flow
//! ```text
//! transact()
//!     → StepEvent::Await { initial message, deferred work }   (dispatched once)
//! AwaitStep::run(sink)
//!     → modal locked (HideableGuard)
//!     → before()                         → context
//!     → transactions(&context)           → ExecutionPlan
//!     → SafeBatch | Sequential | Single
//!     → after(receipts, context)         (direct signer only)
//!     → modal unlocked on every exit path
//! ```

use alloy::primitives::{Address, TxHash};
use futures_util::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::gas::{self, GasEstimator, SimulationRequest};
use crate::observability::metrics;
use crate::safe::{SafeProposer, SafeTransaction, SafeTxParams};
use crate::transact::backend::{Receipt, SubmittedTransaction};
use crate::transact::error::{TransactError, TransactResult};
use crate::transact::modal::{HideableGuard, ModalControl};
use crate::transact::payload::{TransactPayload, TransactionCall, TransactionSpec};
use crate::transact::plan::ExecutionPlan;
use crate::transact::status::{self, ProgressSink, StatusMessage};
use crate::transact::wallet_state::WalletState;

/// Confirmations awaited per transaction outside Safe mode.
pub const REQUIRED_CONFIRMATIONS: u64 = 1;

/// How a flow ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransactOutcome {
    /// Every transaction confirmed; receipts in submission order.
    Confirmed { receipts: Vec<Receipt> },
    /// Handed to the multisig; co-signers confirm out of band.
    Proposed {
        hashes: Vec<TxHash>,
        safe_tx_gas: Option<u64>,
    },
}

impl TransactOutcome {
    pub fn receipts(&self) -> &[Receipt] {
        match self {
            Self::Confirmed { receipts } => receipts,
            Self::Proposed { .. } => &[],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Confirmed { .. } => "confirmed",
            Self::Proposed { .. } => "proposed",
        }
    }
}

type Work = Box<dyn FnOnce(Arc<dyn ProgressSink>) -> BoxFuture<'static, TransactResult<TransactOutcome>> + Send>;

/// Deferred unit of work handed to the UI.
pub struct AwaitStep {
    /// Shown until the first progress update arrives.
    pub message: StatusMessage,
    work: Work,
}

impl AwaitStep {
    /// Drive the flow to completion, reporting progress to `sink`.
    pub async fn run(self, sink: Arc<dyn ProgressSink>) -> TransactResult<TransactOutcome> {
        (self.work)(sink).await
    }
}

impl std::fmt::Debug for AwaitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwaitStep")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Events a step emits to its stepper.
#[derive(Debug)]
pub enum StepEvent {
    Await(AwaitStep),
}

pub trait StepDispatcher {
    fn dispatch(&self, event: StepEvent);
}

impl StepDispatcher for mpsc::UnboundedSender<StepEvent> {
    fn dispatch(&self, event: StepEvent) {
        if self.send(event).is_err() {
            tracing::warn!("Step event dropped: stepper is gone");
        }
    }
}

/// Entry point holding the collaborators shared by every flow.
#[derive(Clone)]
pub struct Transactor {
    modal: Arc<dyn ModalControl>,
    estimator: Arc<dyn GasEstimator>,
    proposer: Option<Arc<dyn SafeProposer>>,
}

impl Transactor {
    pub fn new(modal: Arc<dyn ModalControl>, estimator: Arc<dyn GasEstimator>) -> Self {
        Self {
            modal,
            estimator,
            proposer: None,
        }
    }

    /// Backend for Safe batch proposals.
    pub fn with_safe_proposer(mut self, proposer: Arc<dyn SafeProposer>) -> Self {
        self.proposer = Some(proposer);
        self
    }

    /// Prepare a flow without dispatching it.
    ///
    /// Fails immediately when the wallet has no active address.
    pub fn prepare<C>(&self, wallet: &WalletState, payload: TransactPayload<C>) -> TransactResult<AwaitStep>
    where
        C: Default + Send + 'static,
    {
        let address = wallet.address.ok_or(TransactError::NoActiveAddress)?;
        let message = payload.initial_message();
        let flow = Flow {
            id: Uuid::new_v4(),
            address,
            safe_mode: wallet.is_safe(),
            wallet: wallet.clone(),
            transactor: self.clone(),
        };

        Ok(AwaitStep {
            message,
            work: Box::new(move |sink| flow.run(payload, sink).boxed()),
        })
    }

    /// Prepare a flow and dispatch it as a single await event.
    pub fn transact<C>(
        &self,
        dispatcher: &dyn StepDispatcher,
        wallet: &WalletState,
        payload: TransactPayload<C>,
    ) -> TransactResult<()>
    where
        C: Default + Send + 'static,
    {
        let step = self.prepare(wallet, payload)?;
        dispatcher.dispatch(StepEvent::Await(step));
        Ok(())
    }
}

impl std::fmt::Debug for Transactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transactor")
            .field("safe_proposer", &self.proposer.is_some())
            .finish_non_exhaustive()
    }
}

/// One invocation; consumed by `run`.
struct Flow {
    id: Uuid,
    address: Address,
    safe_mode: bool,
    wallet: WalletState,
    transactor: Transactor,
}

impl Flow {
    async fn run<C>(self, payload: TransactPayload<C>, sink: Arc<dyn ProgressSink>) -> TransactResult<TransactOutcome>
    where
        C: Default + Send + 'static,
    {
        let span = tracing::info_span!(
            "transact",
            flow_id = %self.id,
            address = %self.address,
            safe_mode = self.safe_mode,
            chain_id = self.wallet.network.chain_id.0,
        );

        async move {
            let started = Instant::now();
            let result = self.execute(payload, sink.as_ref()).await;

            match &result {
                Ok(outcome) => {
                    tracing::info!(outcome = outcome.label(), "Transact flow completed");
                    metrics::record_flow(outcome.label(), started.elapsed());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Transact flow failed");
                    metrics::record_flow("failed", started.elapsed());
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute<C>(&self, payload: TransactPayload<C>, sink: &dyn ProgressSink) -> TransactResult<TransactOutcome>
    where
        C: Default + Send + 'static,
    {
        let _hideable = HideableGuard::lock(self.transactor.modal.clone());
        let TransactPayload {
            before,
            transactions,
            after,
            messages,
        } = payload;

        let context = match before {
            Some(before) => {
                if let Some(status) = messages.during_before.clone() {
                    sink.update(status);
                }
                tracing::debug!("Running before step");
                before().await.map_err(TransactError::Before)?
            }
            None => C::default(),
        };

        let plan = ExecutionPlan::new(self.safe_mode, transactions(&context));
        tracing::debug!(plan = plan.kind().as_str(), "Execution plan selected");
        metrics::record_plan(plan.kind());

        let outcome = match plan {
            ExecutionPlan::SafeBatch(specs) => self.propose_batch(specs, sink).await?,
            ExecutionPlan::Sequential(specs) => {
                let mut receipts = Vec::with_capacity(specs.len());
                for spec in specs {
                    let submitted = self.submit(spec, sink).await?;
                    receipts.push(self.confirm(submitted.as_ref()).await?);
                }
                TransactOutcome::Confirmed { receipts }
            }
            ExecutionPlan::Single(spec) => {
                let submitted = self.submit(spec, sink).await?;
                if self.safe_mode {
                    TransactOutcome::Proposed {
                        hashes: vec![submitted.hash()],
                        safe_tx_gas: None,
                    }
                } else {
                    TransactOutcome::Confirmed {
                        receipts: vec![self.confirm(submitted.as_ref()).await?],
                    }
                }
            }
        };

        // Safe proposals resolve later, so there is nothing to finalize yet
        if !self.safe_mode {
            sink.update(messages.during_after.unwrap_or_else(status::wrapping_up));
            if let Some(after) = after {
                tracing::debug!(receipts = outcome.receipts().len(), "Running after step");
                after(outcome.receipts().to_vec(), context)
                    .await
                    .map_err(TransactError::After)?;
            }
        }

        Ok(outcome)
    }

    async fn propose_batch(
        &self,
        specs: Vec<TransactionSpec>,
        sink: &dyn ProgressSink,
    ) -> TransactResult<TransactOutcome> {
        let proposer = self
            .transactor
            .proposer
            .as_ref()
            .ok_or(TransactError::NoSafeProposer)?;

        let txs = specs
            .iter()
            .map(TransactionSpec::safe_transaction)
            .collect::<TransactResult<Vec<SafeTransaction>>>()?;

        let request = SimulationRequest::for_batch(
            self.wallet.network.chain_id.0,
            self.address,
            txs.iter().map(|tx| (tx.to, &tx.data)),
        );
        let safe_tx_gas = gas::estimate_batch_gas(self.transactor.estimator.as_ref(), &request)
            .await
            .map_err(TransactError::GasEstimation)?;
        metrics::record_estimated_gas(safe_tx_gas);

        sink.update(status::waiting_for_signature(true));

        let hash = proposer
            .propose_batch(&txs, SafeTxParams::with_gas(safe_tx_gas))
            .await?;
        metrics::record_submissions(txs.len() as u64, true);

        Ok(TransactOutcome::Proposed {
            hashes: vec![hash],
            safe_tx_gas: Some(safe_tx_gas),
        })
    }

    /// Report signature copy, submit, report confirmation copy.
    async fn submit(
        &self,
        spec: TransactionSpec,
        sink: &dyn ProgressSink,
    ) -> TransactResult<Box<dyn SubmittedTransaction>> {
        let TransactionSpec {
            call,
            waiting_signature_message,
            waiting_confirmation_message,
        } = spec;

        sink.update(
            waiting_signature_message
                .unwrap_or_else(|| status::waiting_for_signature(self.safe_mode)),
        );

        let submitted = match call {
            TransactionCall::Populated(request) => {
                let signer = self.wallet.signer.as_ref().ok_or(TransactError::NoSigner)?;
                signer.send_transaction(&request).await?
            }
            TransactionCall::Submit(factory) => factory().await?,
        };

        let tx_hash = submitted.hash();
        tracing::info!(tx_hash = %tx_hash, "Transaction submitted");
        metrics::record_submissions(1, self.safe_mode);

        sink.update(waiting_confirmation_message.unwrap_or_else(|| {
            status::waiting_for_confirmation(&self.wallet.network, &tx_hash)
        }));

        Ok(submitted)
    }

    async fn confirm(&self, submitted: &dyn SubmittedTransaction) -> TransactResult<Receipt> {
        let receipt = submitted.wait(REQUIRED_CONFIRMATIONS).await?;
        tracing::info!(
            tx_hash = %receipt.transaction_hash,
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );
        Ok(receipt)
    }
}
