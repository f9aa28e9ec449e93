//! Gas estimation for multisig batches.
//!
//! # Data Flow
//! ```text
//! batched call descriptors
//!     → types.rs (one simulation per call)
//!     → client.rs (single POST to the Gas Estimation Service)
//!     → total_gas_used (sum, reject non-positive)
//!     → with_safety_margin (ceil(sum * 1.1))
//!     → safeTxGas of the proposal
//! ```
//!
//! # Design Decisions
//! - Batched calls depend on each other, so they are simulated together by
//!   the service instead of estimated one by one over RPC
//! - No fallback: any failure aborts the flow before a signature prompt

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::SimulationClient;
pub use types::{GasEstimationError, Simulation, SimulationRequest, SimulationResponse};

/// Margin added on top of simulated gas, in percent. Block state keeps
/// advancing while co-signers confirm, which can change the execution path.
pub const GAS_SAFETY_MARGIN_PERCENT: u64 = 10;

/// Anything that can simulate a batch of calls.
#[async_trait]
pub trait GasEstimator: Send + Sync {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, GasEstimationError>;
}

/// Sum gas over all simulation results; the total must be positive.
pub fn total_gas_used(response: &SimulationResponse) -> Result<u64, GasEstimationError> {
    let total = response
        .simulation_results
        .iter()
        .try_fold(0u64, |acc, result| acc.checked_add(result.simulation.gas_used))
        .ok_or(GasEstimationError::Overflow)?;

    if total == 0 {
        return Err(GasEstimationError::NonPositive(total));
    }
    Ok(total)
}

/// `ceil(gas * 1.1)` in integer arithmetic.
pub fn with_safety_margin(gas: u64) -> Result<u64, GasEstimationError> {
    let scaled = gas as u128 * (100 + GAS_SAFETY_MARGIN_PERCENT) as u128;
    u64::try_from(scaled.div_ceil(100)).map_err(|_| GasEstimationError::Overflow)
}

/// Simulate a batch and return the buffered gas limit for its proposal.
pub async fn estimate_batch_gas(
    estimator: &dyn GasEstimator,
    request: &SimulationRequest,
) -> Result<u64, GasEstimationError> {
    let response = estimator.simulate(request).await?;
    let total = total_gas_used(&response)?;
    let buffered = with_safety_margin(total)?;

    tracing::debug!(
        simulations = request.simulations.len(),
        gas_used = total,
        gas_limit = buffered,
        "Batch gas estimated"
    );
    Ok(buffered)
}
