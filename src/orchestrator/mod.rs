//! Transaction submission and lifecycle tracking.
//!
//! # Responsibilities
//! - Convert the wallet's fire-and-forget signing flow into an explicit
//!   per-call state machine
//! - Enforce single-flight: at most one transaction past `Idle` at a time
//! - Gate obviously-invalid actions client-side before any network call
//! - Refresh contract state once after a fixed post-submission delay
//!
//! # State Transitions
//! ```text
//! Idle → Submitting → AwaitingConfirmation → Confirmed
//!          │                                     (slot released)
//!          ├→ Cancelled (wallet prompt dismissed)
//!          └→ Failed    (signing/broadcast error)
//! ```
//! The three terminal states release the slot immediately; the observable
//! phase rests at `Idle` and the completed flight stays readable for
//! audit via [`TransactionOrchestrator::active_transaction`].
//!
//! Confirmation is inferred, not verified: after the delay the snapshot
//! cache is invalidated and re-fetched once, and the flight is marked
//! `Confirmed` without checking the transaction's own on-chain status.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tokio::time::sleep;

use crate::amount::Amount;
use crate::chain::traits::{SigningOutcome, TransactionSigner};
use crate::chain::types::{ConditionCode, ContractCall, FunctionArg, PostCondition, TxId};
use crate::config::{ContractConfig, TransactionConfig};
use crate::error::{ClientError, ClientResult};
use crate::query::{ContractQueryService, ContractSnapshot};
use crate::session::SessionManager;

/// Contract functions this client submits.
const FN_PLEDGE: &str = "pledge";
const FN_REFUND: &str = "refund";
const FN_CLAIM: &str = "claim-funds";
const FN_CANCEL: &str = "cancel-campaign";

/// Lifecycle phase of the current (or most recent) flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Idle,
    Submitting,
    AwaitingConfirmation,
    Confirmed,
    Failed,
    Cancelled,
}

impl TxPhase {
    /// True while a flight occupies the single-flight slot.
    pub fn in_flight(&self) -> bool {
        matches!(self, TxPhase::Submitting | TxPhase::AwaitingConfirmation)
    }
}

/// Terminal status of a tracked flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Submitted,
    Confirmed,
    Failed,
    Cancelled,
}

/// Record of one submission flight. Transitions to a terminal status
/// exactly once, then is retained as the audit record of the last flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Transaction id, present once the wallet accepted the call. Flights
    /// cancelled or failed during signing never receive one.
    pub id: Option<TxId>,
    pub function_name: String,
    pub submitted_at: SystemTime,
    pub status: TxStatus,
}

/// Observable orchestrator state, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorView {
    pub phase: TxPhase,
    /// The active flight while one is running, otherwise the last
    /// completed one.
    pub transaction: Option<PendingTransaction>,
}

struct FlightState {
    phase: TxPhase,
    active: Option<PendingTransaction>,
    last_completed: Option<PendingTransaction>,
}

/// Submits state-changing contract calls and tracks each to completion.
pub struct TransactionOrchestrator {
    session: Arc<SessionManager>,
    query: Arc<ContractQueryService>,
    signer: Arc<dyn TransactionSigner>,
    contract: ContractConfig,
    confirmation_delay: Duration,
    state: Mutex<FlightState>,
}

impl TransactionOrchestrator {
    pub fn new(
        session: Arc<SessionManager>,
        query: Arc<ContractQueryService>,
        signer: Arc<dyn TransactionSigner>,
        contract: ContractConfig,
        transactions: &TransactionConfig,
    ) -> Self {
        Self {
            session,
            query,
            signer,
            contract,
            confirmation_delay: Duration::from_secs(transactions.confirmation_delay_secs),
            state: Mutex::new(FlightState {
                phase: TxPhase::Idle,
                active: None,
                last_completed: None,
            }),
        }
    }

    // Actions

    /// Pledge `amount` to the campaign. The amount must be strictly
    /// positive; a post condition pins the transfer to exactly that value.
    pub async fn pledge(&self, amount: Amount) -> ClientResult<TxId> {
        let sender = self
            .session
            .current_identity()
            .ok_or(ClientError::NoActiveSession)?;

        if amount.is_zero() {
            return Err(ClientError::InvalidArgument(
                "pledge amount must be positive".to_string(),
            ));
        }

        self.gate_snapshot()?;

        let post_condition = PostCondition {
            principal: sender,
            condition: ConditionCode::Eq,
            amount: amount.base_units(),
        };

        self.submit(
            FN_PLEDGE,
            vec![FunctionArg::uint(amount.base_units())],
            vec![post_condition],
        )
        .await
    }

    /// Request a refund. Only sensible once the campaign failed and the
    /// deadline has passed as of the last snapshot.
    pub async fn refund(&self) -> ClientResult<TxId> {
        let snapshot = self.gate_snapshot()?;
        if snapshot.funding_successful {
            return Err(ClientError::InvalidArgument(
                "refunds are only available when the campaign did not reach its goal".to_string(),
            ));
        }
        if snapshot.chain_height < snapshot.deadline {
            return Err(ClientError::InvalidArgument(format!(
                "campaign deadline (block {}) has not passed as of the last fetch (block {})",
                snapshot.deadline, snapshot.chain_height
            )));
        }
        self.submit(FN_REFUND, Vec::new(), Vec::new()).await
    }

    /// Claim the raised funds (project owner). Requires a successful
    /// campaign.
    pub async fn claim_funds(&self) -> ClientResult<TxId> {
        let snapshot = self.gate_snapshot()?;
        if !snapshot.funding_successful {
            return Err(ClientError::InvalidArgument(
                "funds can only be claimed after the goal is reached".to_string(),
            ));
        }
        self.submit(FN_CLAIM, Vec::new(), Vec::new()).await
    }

    /// Cancel the campaign (project owner). Only while the goal is unmet.
    pub async fn cancel_campaign(&self) -> ClientResult<TxId> {
        let snapshot = self.gate_snapshot()?;
        if snapshot.funding_successful {
            return Err(ClientError::InvalidArgument(
                "a campaign that reached its goal cannot be cancelled".to_string(),
            ));
        }
        self.submit(FN_CANCEL, Vec::new(), Vec::new()).await
    }

    // Core state machine

    /// Submit a state-changing contract call and track it to completion.
    ///
    /// Drives the whole lifecycle: signing round-trip, the single
    /// post-acceptance confirmation delay, and the cache refresh. Callers
    /// that need the UI to stay responsive spawn this onto a task and
    /// observe progress through [`Self::active_transaction`].
    pub async fn submit(
        &self,
        function_name: &str,
        function_args: Vec<FunctionArg>,
        post_conditions: Vec<PostCondition>,
    ) -> ClientResult<TxId> {
        let identity = self
            .session
            .current_identity()
            .ok_or(ClientError::NoActiveSession)?;

        // Claim the single-flight slot.
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if state.phase.in_flight() {
                return Err(ClientError::TransactionInProgress);
            }
            transition(&mut state, TxPhase::Submitting);
            state.active = Some(PendingTransaction {
                id: None,
                function_name: function_name.to_string(),
                submitted_at: SystemTime::now(),
                status: TxStatus::Submitted,
            });
        }

        tracing::info!(
            function = function_name,
            sender = %identity,
            "submitting contract call"
        );

        let call = ContractCall {
            contract_address: self.contract.address.clone().into(),
            contract_name: self.contract.name.clone(),
            function_name: function_name.to_string(),
            function_args,
            post_conditions,
        };

        let tx_id = match self.signer.sign_contract_call(&call).await {
            Ok(SigningOutcome::Submitted(tx_id)) => tx_id,
            Ok(SigningOutcome::Cancelled) => {
                tracing::info!(function = function_name, "signing cancelled by user");
                self.finish(TxStatus::Cancelled, None);
                return Err(ClientError::UserCancelled);
            }
            Err(message) => {
                tracing::warn!(function = function_name, error = %message, "submission failed");
                self.finish(TxStatus::Failed, None);
                return Err(ClientError::Submission(message));
            }
        };

        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            transition(&mut state, TxPhase::AwaitingConfirmation);
            if let Some(active) = state.active.as_mut() {
                active.id = Some(tx_id.clone());
            }
        }

        tracing::info!(tx_id = %tx_id, "transaction accepted, awaiting confirmation");

        // Single delayed check, not a polling loop: wait out the grace
        // period, then re-derive ground truth from a fresh snapshot.
        sleep(self.confirmation_delay).await;

        self.query.invalidate();
        if let Err(e) = self.query.fetch_snapshot(identity.as_str()).await {
            tracing::warn!(tx_id = %tx_id, error = %e, "post-confirmation refresh failed");
        }

        if self.session.current_identity().as_ref() != Some(&identity) {
            tracing::warn!(
                tx_id = %tx_id,
                address = %identity,
                "flight completed for a signed-out identity, recording as orphaned"
            );
        }

        tracing::info!(tx_id = %tx_id, "transaction confirmed");
        self.finish(TxStatus::Confirmed, Some(tx_id.clone()));
        Ok(tx_id)
    }

    /// Read-only projection of the current state for UI consumption.
    pub fn active_transaction(&self) -> OrchestratorView {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        OrchestratorView {
            phase: state.phase,
            transaction: state.active.clone().or_else(|| state.last_completed.clone()),
        }
    }

    fn gate_snapshot(&self) -> ClientResult<Arc<ContractSnapshot>> {
        self.query.latest_snapshot().ok_or_else(|| {
            ClientError::InvalidArgument("contract state unknown, fetch a snapshot first".to_string())
        })
    }

    /// Complete the active flight: record its terminal status, retain it
    /// for audit, release the slot.
    fn finish(&self, status: TxStatus, tx_id: Option<TxId>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let terminal = match status {
            TxStatus::Confirmed => TxPhase::Confirmed,
            TxStatus::Failed => TxPhase::Failed,
            TxStatus::Cancelled => TxPhase::Cancelled,
            TxStatus::Submitted => TxPhase::AwaitingConfirmation,
        };
        transition(&mut state, terminal);

        if let Some(mut flight) = state.active.take() {
            flight.status = status;
            if flight.id.is_none() {
                flight.id = tx_id;
            }
            state.last_completed = Some(flight);
        }

        transition(&mut state, TxPhase::Idle);
    }
}

fn transition(state: &mut FlightState, to: TxPhase) {
    tracing::debug!(from = ?state.phase, to = ?to, "orchestrator transition");
    state.phase = to;
}
