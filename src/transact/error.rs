//! Orchestrator error type.

use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::gas::GasEstimationError;
use crate::safe::SafeError;

/// Boxed error returned by caller-supplied `before`/`after` steps.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while preparing or running a transact flow.
#[derive(Debug, Error)]
pub enum TransactError {
    /// The wallet snapshot has no active address.
    #[error("No active wallet address")]
    NoActiveAddress,

    /// A populated transaction needs a signer but the wallet has none.
    #[error("No signer available for the active wallet")]
    NoSigner,

    /// Safe mode batch without a proposal backend.
    #[error("No Safe proposal backend configured")]
    NoSafeProposer,

    /// Internal invariant violated (e.g. batched call without `to`/`data`).
    #[error("Unreachable: {0}")]
    Unreachable(&'static str),

    #[error("Unable to estimate gas for batch operation: {0}")]
    GasEstimation(#[source] GasEstimationError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Safe(#[from] SafeError),

    #[error("before step failed: {0}")]
    Before(#[source] BoxError),

    #[error("after step failed: {0}")]
    After(#[source] BoxError),
}

pub type TransactResult<T> = Result<T, TransactError>;
