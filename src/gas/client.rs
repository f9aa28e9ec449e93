//! HTTP client for the Gas Estimation Service.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::GasEstimationConfig;
use crate::gas::types::{GasEstimationError, SimulationRequest, SimulationResponse};
use crate::gas::GasEstimator;

/// Posts batch simulations to a configured endpoint.
#[derive(Debug, Clone)]
pub struct SimulationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SimulationClient {
    pub fn new(config: &GasEstimationConfig) -> Result<Self, GasEstimationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GasEstimator for SimulationClient {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, GasEstimationError> {
        let resp = self.client.post(&self.endpoint).json(request).send().await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(GasEstimationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
