//! Wire types for the Gas Estimation Service.

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One simulated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    pub network_id: String,
    pub save: bool,
    pub save_if_fails: bool,
    pub from: Address,
    pub to: Address,
    pub input: Bytes,
    /// Always zero; batched calls never carry native value.
    pub value: u64,
}

/// Body of a batch simulation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub simulations: Vec<Simulation>,
}

impl SimulationRequest {
    /// One simulation per call, in call order, all sent from `from`.
    pub fn for_batch<'a>(
        chain_id: u64,
        from: Address,
        calls: impl IntoIterator<Item = (Address, &'a Bytes)>,
    ) -> Self {
        let network_id = chain_id.to_string();
        let simulations = calls
            .into_iter()
            .map(|(to, input)| Simulation {
                network_id: network_id.clone(),
                save: true,
                save_if_fails: true,
                from,
                to,
                input: input.clone(),
                value: 0,
            })
            .collect();
        Self { simulations }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub gas_used: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub simulation: SimulationOutcome,
}

/// Expected response shape; anything else is a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub simulation_results: Vec<SimulationResult>,
}

/// Errors from the Gas Estimation Service or from interpreting its answer.
#[derive(Debug, Error)]
pub enum GasEstimationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("estimated gas must be positive, got {0}")]
    NonPositive(u64),

    #[error("estimated gas overflows u64")]
    Overflow,
}
