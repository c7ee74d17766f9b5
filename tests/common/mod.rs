//! Shared mock collaborators for integration tests.
//!
//! Hand-rolled doubles with call counters so tests can assert not just on
//! results but on how many network round-trips actually happened.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::sleep;

use crowdfund_client::chain::traits::{
    ChainReader, IdentityProvider, SigningOutcome, TransactionSigner,
};
use crowdfund_client::chain::types::{Address, ContractCall, ReadOnlyCall, TxId};
use crowdfund_client::config::ContractConfig;
use crowdfund_client::error::{ClientResult, QueryError};

pub const TEST_ADDRESS: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";

pub fn test_contract() -> ContractConfig {
    ContractConfig {
        address: "ST000000000000000000002AMW42H".to_string(),
        name: "crowdfunding".to_string(),
    }
}

/// Build the JSON value the node would return for `get-status`.
pub fn status_value(goal: u64, pledged: u64, deadline: u64, successful: bool) -> Value {
    json!({
        "funding-goal": { "value": goal.to_string() },
        "total-pledged": { "value": pledged.to_string() },
        "deadline": { "value": deadline },
        "funding-successful": { "value": successful },
    })
}

// Identity provider

/// Signs in immediately with a fixed address.
pub struct AutoSignIn;

#[async_trait]
impl IdentityProvider for AutoSignIn {
    async fn request_sign_in(&self) -> ClientResult<Address> {
        Ok(Address::new(TEST_ADDRESS))
    }

    fn sign_out(&self) {}
}

// Chain reader

/// One scripted response for the read path.
pub enum ReadScript {
    /// Sleep, then return this status value.
    Ok(Duration, Value),
    /// Sleep, then fail with a network error.
    NetworkError(Duration, &'static str),
}

/// Reader that replays scripted responses in order and counts calls.
/// An exhausted script fails the read, which keeps accidental extra
/// round-trips visible in tests.
pub struct ScriptedReader {
    script: Mutex<VecDeque<ReadScript>>,
    height: u64,
    pub read_calls: AtomicUsize,
}

impl ScriptedReader {
    pub fn new(height: u64, script: Vec<ReadScript>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            height,
            read_calls: AtomicUsize::new(0),
        })
    }

    pub fn reads(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for ScriptedReader {
    async fn call_read_only(&self, _call: &ReadOnlyCall) -> Result<Value, QueryError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(ReadScript::Ok(delay, value)) => {
                sleep(delay).await;
                Ok(value)
            }
            Some(ReadScript::NetworkError(delay, message)) => {
                sleep(delay).await;
                Err(QueryError::Network(message.to_string()))
            }
            None => Err(QueryError::Network("scripted reader exhausted".to_string())),
        }
    }

    async fn current_block_height(&self) -> Result<u64, QueryError> {
        Ok(self.height)
    }
}

// Transaction signer

/// What the mock wallet does with a signing request.
#[derive(Clone)]
pub enum SignerBehavior {
    Accept(&'static str),
    Cancel,
    Fail(&'static str),
}

/// Signer that resolves after a fixed delay and records the calls it saw.
pub struct MockSigner {
    behavior: SignerBehavior,
    delay: Duration,
    pub calls: AtomicUsize,
    pub last_call: Mutex<Option<ContractCall>>,
}

impl MockSigner {
    pub fn new(behavior: SignerBehavior) -> Arc<Self> {
        Self::with_delay(behavior, Duration::ZERO)
    }

    pub fn with_delay(behavior: SignerBehavior, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            delay,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSigner for MockSigner {
    async fn sign_contract_call(&self, call: &ContractCall) -> Result<SigningOutcome, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some(call.clone());
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        match &self.behavior {
            SignerBehavior::Accept(tx_id) => Ok(SigningOutcome::Submitted(TxId::new(*tx_id))),
            SignerBehavior::Cancel => Ok(SigningOutcome::Cancelled),
            SignerBehavior::Fail(message) => Err((*message).to_string()),
        }
    }
}
