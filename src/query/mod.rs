//! Read-only contract state querying and caching.
//!
//! # Responsibilities
//! - Issue the fixed `get-status` read-only call through the chain reader
//! - Decode the structured response into a [`ContractSnapshot`]
//! - Keep the freshest snapshot visible under out-of-order completion
//!
//! Every fetch is tagged with a strictly increasing sequence number taken
//! before the first suspension point. A completed fetch is installed only
//! if no later-sequenced fetch has been accepted already (last writer by
//! sequence, not by arrival time), so a slow stale request can never
//! clobber fresher data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde_json::Value;

use crate::chain::traits::ChainReader;
use crate::chain::types::ReadOnlyCall;
use crate::config::ContractConfig;
use crate::error::QueryError;

/// Read-only function exposed by the campaign contract.
const STATUS_FUNCTION: &str = "get-status";

/// Immutable point-in-time view of the campaign contract.
///
/// Replaced wholesale on each accepted fetch; consumers hold `Arc`s and
/// never observe partial updates. Amounts are integers in the contract's
/// base unit; display scaling is the presentation layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSnapshot {
    /// Funding target in base units.
    pub funding_goal: u128,
    /// Total pledged so far in base units.
    pub total_pledged: u128,
    /// Campaign deadline as a block height.
    pub deadline: u64,
    /// Whether the goal has been reached.
    pub funding_successful: bool,
    /// Chain tip height observed when this snapshot was taken.
    pub chain_height: u64,
    /// Wall-clock fetch time.
    pub fetched_at: SystemTime,
}

struct CacheState {
    latest: Option<Arc<ContractSnapshot>>,
    /// Sequence of the snapshot in `latest`; also the floor below which
    /// completions are discarded.
    accepted_seq: u64,
}

/// Fetches and caches campaign contract state.
pub struct ContractQueryService {
    reader: Arc<dyn ChainReader>,
    contract: ContractConfig,
    next_seq: AtomicU64,
    state: Mutex<CacheState>,
}

impl ContractQueryService {
    pub fn new(reader: Arc<dyn ChainReader>, contract: ContractConfig) -> Self {
        Self {
            reader,
            contract,
            next_seq: AtomicU64::new(0),
            state: Mutex::new(CacheState {
                latest: None,
                accepted_seq: 0,
            }),
        }
    }

    /// Fetch a fresh snapshot, attributed to `sender` (empty string when
    /// unauthenticated).
    ///
    /// Returns the fetched snapshot if it was accepted into the cache,
    /// or the fresher already-cached one if this fetch lost the sequence
    /// race. A fetch discarded because the cache was invalidated while
    /// it was in flight gets its own (uncached) result back;
    /// [`Self::latest_snapshot`] stays `None` until a post-invalidation
    /// fetch succeeds.
    pub async fn fetch_snapshot(&self, sender: &str) -> Result<Arc<ContractSnapshot>, QueryError> {
        // Sequence is claimed before the first await so it reflects issue
        // order, not completion order.
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let call = ReadOnlyCall {
            contract_address: self.contract.address.clone().into(),
            contract_name: self.contract.name.clone(),
            function_name: STATUS_FUNCTION.to_string(),
            function_args: Vec::new(),
            sender_address: sender.to_string(),
        };

        let value = self.reader.call_read_only(&call).await?;
        let chain_height = self.reader.current_block_height().await?;
        let snapshot = Arc::new(decode_snapshot(&value, chain_height)?);

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if seq > state.accepted_seq {
            state.accepted_seq = seq;
            state.latest = Some(snapshot.clone());
            tracing::debug!(
                seq,
                total_pledged = snapshot.total_pledged,
                chain_height = snapshot.chain_height,
                "snapshot accepted"
            );
            Ok(snapshot)
        } else {
            tracing::debug!(seq, accepted_seq = state.accepted_seq, "stale fetch discarded");
            Ok(state.latest.clone().unwrap_or(snapshot))
        }
    }

    /// The most recently accepted snapshot, or `None` if nothing has been
    /// fetched successfully (or the cache was invalidated since).
    pub fn latest_snapshot(&self) -> Option<Arc<ContractSnapshot>> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .latest
            .clone()
    }

    /// Drop the cached snapshot and discard every fetch currently in
    /// flight: the acceptance floor rises to the highest sequence issued
    /// so far, so only fetches started after this call can install.
    ///
    /// Used after a confirmed mutating transaction, when cached state is
    /// known to be out of date.
    pub fn invalidate(&self) {
        let floor = self.next_seq.load(Ordering::SeqCst);
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.latest = None;
        state.accepted_seq = floor;
        tracing::debug!(floor, "snapshot cache invalidated");
    }
}

/// Decode the contract's `get-status` result.
///
/// The node returns a map of named fields, each wrapped in a `{"value": _}`
/// envelope; uints arrive as decimal strings or numbers.
fn decode_snapshot(value: &Value, chain_height: u64) -> Result<ContractSnapshot, QueryError> {
    let deadline = uint_field(value, "deadline")?;
    Ok(ContractSnapshot {
        funding_goal: uint_field(value, "funding-goal")?,
        total_pledged: uint_field(value, "total-pledged")?,
        deadline: u64::try_from(deadline).map_err(|_| {
            QueryError::MalformedResponse(format!(
                "field 'deadline' exceeds the block height range: {}",
                deadline
            ))
        })?,
        funding_successful: bool_field(value, "funding-successful")?,
        chain_height,
        fetched_at: SystemTime::now(),
    })
}

fn field<'a>(value: &'a Value, name: &str) -> Result<&'a Value, QueryError> {
    value
        .get(name)
        .and_then(|v| v.get("value"))
        .ok_or_else(|| QueryError::MalformedResponse(format!("missing field '{}'", name)))
}

fn uint_field(value: &Value, name: &str) -> Result<u128, QueryError> {
    let inner = field(value, name)?;
    match inner {
        Value::String(s) => s.parse().map_err(|_| {
            QueryError::MalformedResponse(format!("field '{}' is not a uint: {}", name, s))
        }),
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| QueryError::MalformedResponse(format!("field '{}' is negative", name))),
        other => Err(QueryError::MalformedResponse(format!(
            "field '{}' has unexpected type: {}",
            name, other
        ))),
    }
}

fn bool_field(value: &Value, name: &str) -> Result<bool, QueryError> {
    field(value, name)?
        .as_bool()
        .ok_or_else(|| QueryError::MalformedResponse(format!("field '{}' is not a bool", name)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn status_value(goal: u64, pledged: u64, deadline: u64, successful: bool) -> Value {
        json!({
            "funding-goal": { "value": goal.to_string() },
            "total-pledged": { "value": pledged.to_string() },
            "deadline": { "value": deadline },
            "funding-successful": { "value": successful },
        })
    }

    #[test]
    fn test_decode_snapshot() {
        let value = status_value(1_000_000, 250_000, 100, false);
        let snapshot = decode_snapshot(&value, 42).unwrap();
        assert_eq!(snapshot.funding_goal, 1_000_000);
        assert_eq!(snapshot.total_pledged, 250_000);
        assert_eq!(snapshot.deadline, 100);
        assert!(!snapshot.funding_successful);
        assert_eq!(snapshot.chain_height, 42);
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let mut value = status_value(1, 1, 1, true);
        value.as_object_mut().unwrap().remove("deadline");
        let err = decode_snapshot(&value, 0).unwrap_err();
        assert!(err.to_string().contains("deadline"));
    }

    #[test]
    fn test_decode_rejects_oversized_deadline() {
        // u64::MAX + 6: must be a decode error, not a wrapped-around
        // height that would corrupt the refund gate.
        let mut value = status_value(1, 1, 1, false);
        value["deadline"] = json!({ "value": "18446744073709551621" });
        let err = decode_snapshot(&value, 0).unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
        assert!(err.to_string().contains("deadline"));
    }

    #[test]
    fn test_decode_rejects_unwrapped_field() {
        // Field present but without the {"value": _} envelope.
        let mut value = status_value(1, 1, 1, true);
        value["funding-goal"] = json!(1);
        assert!(decode_snapshot(&value, 0).is_err());
    }

    #[test]
    fn test_uint_field_accepts_string_and_number() {
        let value = json!({
            "a": { "value": "340282366920938463463374607431768211455" },
            "b": { "value": 7 },
        });
        assert_eq!(uint_field(&value, "a").unwrap(), u128::MAX);
        assert_eq!(uint_field(&value, "b").unwrap(), 7);
    }
}
