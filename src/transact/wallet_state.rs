//! Read-only snapshot of the active wallet.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::types::Network;
use crate::safe::SafeInfo;
use crate::transact::backend::DirectSigner;

/// Wallet state captured when a flow is prepared.
#[derive(Clone)]
pub struct WalletState {
    /// Active account; the Safe's address in Safe mode.
    pub address: Option<Address>,
    /// Set when the account is proxied through a multisig.
    pub safe: Option<SafeInfo>,
    pub network: Network,
    pub signer: Option<Arc<dyn DirectSigner>>,
}

impl WalletState {
    /// Disconnected wallet on `network`.
    pub fn new(network: Network) -> Self {
        Self {
            address: None,
            safe: None,
            network,
            signer: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn DirectSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Proxy the account through the Safe at `address`, which also becomes
    /// the active address.
    pub fn with_safe(mut self, address: Address) -> Self {
        self.safe = Some(SafeInfo { address });
        self.address = Some(address);
        self
    }

    pub fn is_safe(&self) -> bool {
        self.safe.is_some()
    }
}

impl std::fmt::Debug for WalletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletState")
            .field("address", &self.address)
            .field("safe", &self.safe)
            .field("network", &self.network)
            .field("signer", &self.signer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_sets_active_address() {
        let safe = Address::repeat_byte(0x5a);
        let wallet = WalletState::new(Network::new(1, "mainnet")).with_safe(safe);

        assert!(wallet.is_safe());
        assert_eq!(wallet.address, Some(safe));
    }
}
