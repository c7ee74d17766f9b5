//! Chain-facing types, collaborator traits, and the HTTP read client.

pub mod rpc;
pub mod traits;
pub mod types;

pub use rpc::HttpChainReader;
pub use traits::{ChainReader, IdentityProvider, SigningOutcome, TransactionSigner};
pub use types::{Address, ConditionCode, ContractCall, FunctionArg, PostCondition, ReadOnlyCall, TxId};
