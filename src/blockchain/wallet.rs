//! Local signing key for direct (non-multisig) mode.
//!
//! The key is read from `TRANSACT_PRIVATE_KEY` and never logged.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

pub const PRIVATE_KEY_ENV_VAR: &str = "TRANSACT_PRIVATE_KEY";

/// Signing key plus the nonce cursor of its account.
///
/// Clones share the cursor, so a batch submitted through several handles
/// still gets consecutive nonces.
#[derive(Debug, Clone)]
pub struct Wallet {
    key: PrivateKeySigner,
    next_nonce: Arc<AtomicU64>,
    chain_id: u64,
}

impl Wallet {
    /// Parse a hex key; the `0x` prefix is optional.
    pub fn from_private_key(hex_key: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key: PrivateKeySigner = hex_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key: {}", e)))?;

        tracing::info!(address = %key.address(), chain_id, "Loaded signing key");
        Ok(Self {
            key,
            next_nonce: Arc::new(AtomicU64::new(0)),
            chain_id,
        })
    }

    pub fn from_env(chain_id: u64) -> BlockchainResult<Self> {
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(hex_key) => Self::from_private_key(&hex_key, chain_id),
            Err(_) => Err(BlockchainError::Wallet(format!(
                "{} is not set; export it or enable Safe mode",
                PRIVATE_KEY_ENV_VAR
            ))),
        }
    }

    pub fn address(&self) -> Address {
        self.key.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.key.clone())
    }

    /// Hand out the next nonce.
    pub fn reserve_nonce(&self) -> u64 {
        self.next_nonce.fetch_add(1, Ordering::SeqCst)
    }

    /// Move the cursor up to the chain's pending count. Never moves it back,
    /// so nonces reserved for unmined transactions are not reused.
    pub fn observe_chain_nonce(&self, pending_count: u64) {
        self.next_nonce.fetch_max(pending_count, Ordering::SeqCst);
    }

    /// Give back `nonce` after its transaction failed to reach the mempool.
    ///
    /// Only the most recent reservation can be returned; if another nonce was
    /// handed out since, the cursor stays and the next chain observation
    /// decides.
    pub fn release_nonce(&self, nonce: u64) -> bool {
        let Some(next) = nonce.checked_add(1) else {
            return false;
        };
        self.next_nonce
            .compare_exchange(next, nonce, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn peek_nonce(&self) -> u64 {
        self.next_nonce.load(Ordering::SeqCst)
    }
}
