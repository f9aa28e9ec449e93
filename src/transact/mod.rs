//! Transaction orchestration.
//!
//! # Data Flow
//! ```text
//! caller builds TransactPayload (payload.rs)
//!     → Transactor::transact (orchestrator.rs) with a WalletState snapshot
//!     → StepEvent::Await dispatched to the stepper
//!     → stepper runs AwaitStep with its ProgressSink (status.rs)
//!     → ExecutionPlan (plan.rs) picks the path
//!     → DirectSigner / SafeProposer / GasEstimator (backend.rs, safe, gas)
//! ```
//!
//! # Design Decisions
//! - Transactions from one sender are submitted and confirmed strictly in
//!   order; nonces must be serialized
//! - No retries and no cancellation; errors reach whoever runs the step
//! - Modal dismissibility is a scoped guard, released on every exit path

pub mod backend;
pub mod error;
pub mod modal;
pub mod orchestrator;
pub mod payload;
pub mod plan;
pub mod status;
pub mod wallet_state;

pub use backend::{DirectSigner, Receipt, SubmittedTransaction};
pub use error::{BoxError, TransactError, TransactResult};
pub use modal::{HideableGuard, Modal, ModalControl};
pub use orchestrator::{
    AwaitStep, StepDispatcher, StepEvent, TransactOutcome, Transactor, REQUIRED_CONFIRMATIONS,
};
pub use payload::{PhaseMessages, TransactPayload, TransactionCall, TransactionSpec, Transactions};
pub use plan::{ExecutionPlan, PlanKind};
pub use status::{Icon, IconSize, Link, ProgressSink, StatusMessage};
pub use wallet_state::WalletState;
