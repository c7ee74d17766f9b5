//! Collaborator seams.
//!
//! Everything that talks to the outside world (the wallet's sign-in UI,
//! the node's read API, and the wallet's signing popup) is injected
//! behind one of these traits. The core never owns a network protocol or
//! a key.

use async_trait::async_trait;
use serde_json::Value;

use crate::chain::types::{Address, ContractCall, ReadOnlyCall, TxId};
use crate::error::{ClientError, QueryError};

/// Wallet authentication flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Prompt the user to authenticate. Resolves with the wallet address,
    /// `ClientError::UserCancelled` if the prompt is dismissed, or another
    /// error from the provider.
    async fn request_sign_in(&self) -> Result<Address, ClientError>;

    /// Tear down the provider-side session. Infallible by contract.
    fn sign_out(&self);
}

/// Read-only access to chain state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute a read-only contract call and return the structured result
    /// value.
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<Value, QueryError>;

    /// Current chain tip height.
    async fn current_block_height(&self) -> Result<u64, QueryError>;
}

/// Outcome of the wallet signing flow. Exactly one of these resolves per
/// request; errors travel through the `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOutcome {
    /// The wallet signed and broadcast the call.
    Submitted(TxId),
    /// The user dismissed the signing prompt.
    Cancelled,
}

/// State-changing access: fronts the wallet popup that signs and
/// broadcasts a contract call.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Ask the wallet to sign and broadcast `call`. Suspends until the
    /// user finishes or dismisses the prompt, or the broadcast fails; the
    /// error string is surfaced to the user verbatim.
    async fn sign_contract_call(&self, call: &ContractCall) -> Result<SigningOutcome, String>;
}
