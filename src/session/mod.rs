//! Wallet session management.
//!
//! # Responsibilities
//! - Own the wallet-connection state (authenticated or not)
//! - Delegate the actual sign-in flow to the injected identity provider
//! - Hand the active identity to the rest of the client, read-only
//!
//! Exactly two states, unauthenticated and authenticated. There are no
//! ambient globals: the manager is constructed explicitly and shared by
//! `Arc`.

use std::sync::{Arc, Mutex};

use crate::chain::traits::IdentityProvider;
use crate::chain::types::Address;
use crate::error::ClientResult;

/// Owner of the wallet session. All other components read identity
/// through this type and never mutate it.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    identity: Mutex<Option<Address>>,
}

impl SessionManager {
    /// Create an unauthenticated session manager.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            identity: Mutex::new(None),
        }
    }

    /// Authenticate with the wallet.
    ///
    /// Idempotent: if a session is already active its address is returned
    /// without prompting the user again. A decline surfaces as
    /// [`crate::error::ClientError::UserCancelled`] and leaves the session
    /// unauthenticated.
    pub async fn sign_in(&self) -> ClientResult<Address> {
        if let Some(existing) = self.current_identity() {
            tracing::debug!(address = %existing, "sign_in with active session, no-op");
            return Ok(existing);
        }

        let address = self.provider.request_sign_in().await?;

        let mut identity = self.identity.lock().unwrap_or_else(|e| e.into_inner());
        *identity = Some(address.clone());

        tracing::info!(address = %address, "wallet session established");
        Ok(address)
    }

    /// Clear the session. Always succeeds; a sign-out with no active
    /// session is a no-op. Any in-flight submission keyed to the prior
    /// identity keeps running and records its result as orphaned.
    pub fn sign_out(&self) {
        let prior = {
            let mut identity = self.identity.lock().unwrap_or_else(|e| e.into_inner());
            identity.take()
        };

        if let Some(address) = prior {
            self.provider.sign_out();
            tracing::info!(address = %address, "wallet session cleared");
        }
    }

    /// The active identity, or `None` when unauthenticated. Pure read.
    pub fn current_identity(&self) -> Option<Address> {
        self.identity
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_identity().is_some()
    }
}
