//! Metrics collection.
//!
//! # Metrics
//! - `transact_flows_total` (counter): finished flows by outcome (confirmed, proposed, failed)
//! - `transact_flow_duration_seconds` (histogram): wall time of a flow, including signature prompts
//! - `transact_plans_total` (counter): execution plans selected, by plan
//! - `transact_transactions_submitted_total` (counter): calls handed to a backend, by mode
//! - `transact_estimated_gas` (histogram): buffered gas limits of Safe batches
//!
//! No recorder is installed by this crate; without one every call is a no-op.

use std::time::Duration;

use crate::transact::plan::PlanKind;

pub fn record_flow(outcome: &'static str, duration: Duration) {
    metrics::counter!("transact_flows_total", "outcome" => outcome).increment(1);
    metrics::histogram!("transact_flow_duration_seconds", "outcome" => outcome)
        .record(duration.as_secs_f64());
}

pub fn record_plan(kind: PlanKind) {
    metrics::counter!("transact_plans_total", "plan" => kind.as_str()).increment(1);
}

pub fn record_submissions(count: u64, safe_mode: bool) {
    let mode = if safe_mode { "safe" } else { "direct" };
    metrics::counter!("transact_transactions_submitted_total", "mode" => mode).increment(count);
}

pub fn record_estimated_gas(gas: u64) {
    metrics::histogram!("transact_estimated_gas").record(gas as f64);
}
