//! # Wallet Adapter
//!
//! Wallet provider over a fixed account list, with an approval toggle
//! that models the user rejecting the access prompt.

use crate::domain::errors::SdkError;
use crate::domain::value_objects::Address;
use crate::ports::outbound::WalletProvider;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Wallet provider backed by a static account list.
pub struct StaticWallet {
    accounts: Vec<Address>,
    approve: AtomicBool,
}

impl StaticWallet {
    /// Provider granting access to the given accounts.
    #[must_use]
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            approve: AtomicBool::new(true),
        }
    }

    /// Provider that rejects every access request.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            accounts: Vec::new(),
            approve: AtomicBool::new(false),
        }
    }

    /// Toggles whether future requests are approved.
    pub fn set_approval(&self, approve: bool) {
        self.approve.store(approve, Ordering::Relaxed);
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, SdkError> {
        if !self.approve.load(Ordering::Relaxed) {
            return Err(SdkError::WalletUnavailable(
                "account access rejected by user".to_string(),
            ));
        }
        Ok(self.accounts.clone())
    }
}
