//! Crowdfunding Contract Interaction Client
//!
//! Client core for a single crowdfunding contract on a Stacks-style
//! chain: wallet session lifecycle, cached read-only contract state, and
//! a single-flight transaction submission state machine. Everything that
//! touches the outside world (wallet sign-in, node reads, the signing
//! popup) is injected behind the traits in [`chain::traits`].

pub mod amount;
pub mod chain;
pub mod config;
pub mod error;
pub mod observability;
pub mod orchestrator;
pub mod query;
pub mod session;

pub use amount::Amount;
pub use chain::{Address, HttpChainReader, TxId};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, QueryError};
pub use orchestrator::{OrchestratorView, PendingTransaction, TransactionOrchestrator, TxPhase, TxStatus};
pub use query::{ContractQueryService, ContractSnapshot};
pub use session::SessionManager;
