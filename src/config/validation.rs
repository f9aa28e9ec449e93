//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, multipliers >= 1)
//! - Check URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TransactConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::TransactConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &TransactConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let chain = &config.blockchain;

    check_url(&mut errors, "blockchain.rpc_url", &chain.rpc_url);
    for url in &chain.failover_urls {
        check_url(&mut errors, "blockchain.failover_urls", url);
    }
    if let Some(explorer) = &chain.explorer_url {
        check_url(&mut errors, "blockchain.explorer_url", explorer);
    }
    if chain.network_name.trim().is_empty() {
        errors.push(ValidationError::new("blockchain.network_name", "must not be empty"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be greater than 0"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be greater than 0"));
    }
    if !(chain.gas_price_multiplier >= 1.0) {
        errors.push(ValidationError::new(
            "blockchain.gas_price_multiplier",
            format!("must be at least 1.0, got {}", chain.gas_price_multiplier),
        ));
    }

    check_url(&mut errors, "gas_estimation.endpoint", &config.gas_estimation.endpoint);
    if config.gas_estimation.timeout_secs == 0 {
        errors.push(ValidationError::new("gas_estimation.timeout_secs", "must be greater than 0"));
    }

    if config.safe.enabled {
        if config.safe.address.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "safe.address",
                format!("invalid address '{}'", config.safe.address),
            ));
        }
        check_url(&mut errors, "safe.proposal_url", &config.safe.proposal_url);
        if config.safe.timeout_secs == 0 {
            errors.push(ValidationError::new("safe.timeout_secs", "must be greater than 0"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}
