//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! transact flows produce:
//!     → logging.rs (structured log events, one span per flow with its flow_id)
//!     → metrics.rs (counters, histograms)
//! ```

pub mod logging;
pub mod metrics;
