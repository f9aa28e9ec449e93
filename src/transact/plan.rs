//! Execution mode decision table.
//!
//! ```text
//!                 | Single          | Batch
//! ----------------+-----------------+-----------------
//! direct signer   | Single          | Sequential
//! Safe            | Single (no wait)| SafeBatch
//! ```

use crate::transact::payload::{TransactionSpec, Transactions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    SafeBatch,
    Sequential,
    Single,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SafeBatch => "safe_batch",
            Self::Sequential => "sequential",
            Self::Single => "single",
        }
    }
}

/// Transactions routed to one of the execution paths.
#[derive(Debug)]
pub enum ExecutionPlan {
    /// Estimate gas, then propose every call as one atomic Safe batch.
    SafeBatch(Vec<TransactionSpec>),
    /// Submit and confirm one call at a time, in order.
    Sequential(Vec<TransactionSpec>),
    /// Submit one call; confirm it unless in Safe mode.
    Single(TransactionSpec),
}

impl ExecutionPlan {
    pub fn new(safe_mode: bool, transactions: Transactions) -> Self {
        match (safe_mode, transactions) {
            (true, Transactions::Batch(specs)) => Self::SafeBatch(specs),
            (false, Transactions::Batch(specs)) => Self::Sequential(specs),
            (_, Transactions::Single(spec)) => Self::Single(spec),
        }
    }

    pub fn kind(&self) -> PlanKind {
        match self {
            Self::SafeBatch(_) => PlanKind::SafeBatch,
            Self::Sequential(_) => PlanKind::Sequential,
            Self::Single(_) => PlanKind::Single,
        }
    }
}
