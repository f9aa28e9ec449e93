//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + BlockchainConfig (RPC URLs)
//!     → wallet.rs (key loading, nonce tracking)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → transaction.rs (build, sign, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::{PendingTransaction, ProviderSigner};
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId, Network};
pub use wallet::Wallet;
