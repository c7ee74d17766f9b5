//! Client-wide error definitions.

use thiserror::Error;

/// Errors surfaced by the read path (chain-read collaborator + decoding).
#[derive(Debug, Error)]
pub enum QueryError {
    /// Node unreachable or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response arrived but did not decode into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The configured contract does not exist on the target chain.
    #[error("contract not found: {0}")]
    ContractNotFound(String),
}

/// Errors surfaced to callers of the client.
///
/// Nothing here is fatal: every failure resolves the current operation and
/// leaves the client ready for a user-initiated retry.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An operation required an authenticated wallet session.
    #[error("no active session")]
    NoActiveSession,

    /// Caller-supplied input rejected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Read-only query failed.
    #[error("query failed: {0}")]
    Query(#[from] QueryError),

    /// Signing or broadcast failed; the collaborator's message is kept verbatim.
    #[error("submission failed: {0}")]
    Submission(String),

    /// The user dismissed the wallet prompt.
    #[error("cancelled by user")]
    UserCancelled,

    /// A transaction is already in flight; only one may run at a time.
    #[error("a transaction is already in progress")]
    TransactionInProgress,
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
